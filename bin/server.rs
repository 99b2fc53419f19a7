// Diabetes Risk - Web API front end
// Thin HTTP wrapper over the inference pipeline: validate, predict, log.
// The loaded artifacts are read-only, so they are shared across requests
// without locking; only the history CSV needs a mutex.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use diabetes_risk::{
    predict, validate, ArtifactPaths, Artifacts, HistoryEntry, HistoryLog, PatientRecord,
    PredictError, Prediction,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    artifacts: Arc<Artifacts>,
    history: Arc<Mutex<HistoryLog>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Prediction response
#[derive(Serialize)]
struct PredictResponse {
    label: String,
    probability: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            label: prediction.label.as_str().to_string(),
            probability: prediction.probability,
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/predict - Run the pipeline on one patient record
async fn predict_handler(
    State(state): State<AppState>,
    Json(record): Json<PatientRecord>,
) -> impl IntoResponse {
    // Bounds contract: enforced here, at the collecting layer
    if let Err(errors) = validate(&record) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<PredictResponse>::err(messages.join("; "))),
        )
            .into_response();
    }

    match predict(&record, &state.artifacts) {
        Ok(prediction) => {
            // History append is best-effort; a full disk must not fail the verdict
            let entry = HistoryEntry::new(
                &record,
                &prediction,
                &state.artifacts.fingerprints.classifier,
            );
            if let Err(e) = state.history.lock().unwrap().append(&entry) {
                log::warn!("failed to append history entry: {e:#}");
            }

            (
                StatusCode::OK,
                Json(ApiResponse::ok(PredictResponse::from(prediction))),
            )
                .into_response()
        }
        // Request-scoped failures: the process keeps serving
        Err(e @ PredictError::Transform(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<PredictResponse>::err(e.to_string())),
        )
            .into_response(),
        Err(e @ PredictError::Prediction(_)) => {
            log::error!("prediction stage failure: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<PredictResponse>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/history - All logged predictions, oldest first
async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.history.lock().unwrap().load();
    match result {
        Ok(entries) => (StatusCode::OK, Json(ApiResponse::ok(entries))).into_response(),
        Err(e) => {
            log::error!("failed to load history: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<HistoryEntry>>::err(
                    "failed to load history",
                )),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("🌐 Diabetes Risk - Web API");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let args: Vec<String> = std::env::args().collect();
    let artifacts_dir = args.get(1).map(String::as_str).unwrap_or("artifacts");
    let history_file = args
        .get(2)
        .map(String::as_str)
        .unwrap_or("predictions_history.csv");

    // Artifact loading is startup-fatal: do not serve without the full set
    let artifacts = match Artifacts::load(&ArtifactPaths::in_dir(artifacts_dir)) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("❌ Failed to load artifacts from {}/: {}", artifacts_dir, e);
            eprintln!("   The server will not start without a complete artifact set.");
            std::process::exit(1);
        }
    };
    println!("✓ Artifacts loaded from {}/", artifacts_dir);

    let state = AppState {
        artifacts: Arc::new(artifacts),
        history: Arc::new(Mutex::new(HistoryLog::new(history_file))),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/predict", post(predict_handler))
        .route("/history", get(history_handler))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   POST http://localhost:3000/api/predict");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
