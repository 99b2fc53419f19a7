// Diabetes Risk Inference Pipeline - Core Library
// One pipeline, many thin front ends (CLI, API server, tests)

pub mod artifacts;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod record;
pub mod schema;

// Re-export commonly used types
pub use artifacts::{
    ArtifactFingerprints, ArtifactPaths, Artifacts, CategoricalColumn, Classifier,
    ColumnTransformer, MinMaxScaler,
};
pub use error::{ArtifactLoadError, PredictError, PredictionError, TransformError};
pub use history::{HistoryEntry, HistoryLog};
pub use pipeline::predict;
pub use record::{Gender, PatientRecord, Prediction, RiskLabel, SmokingHistory};
pub use schema::{validate, ValidationError, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
