// CLI front end - thin wrapper over the inference pipeline
// Reads a patient record from a JSON file, validates it, predicts, prints
// the verdict and appends it to the history CSV.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::Path;

use diabetes_risk::{
    predict, validate, ArtifactPaths, Artifacts, HistoryEntry, HistoryLog, PatientRecord,
    RiskLabel, VERSION,
};

const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
const DEFAULT_HISTORY_FILE: &str = "predictions_history.csv";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("predict") => {
            let record_path = args.get(2).context(
                "Usage: diabetes-risk predict <patient.json> [artifacts_dir] [history.csv]",
            )?;
            let artifacts_dir = args
                .get(3)
                .map(String::as_str)
                .unwrap_or(DEFAULT_ARTIFACTS_DIR);
            let history_file = args
                .get(4)
                .map(String::as_str)
                .unwrap_or(DEFAULT_HISTORY_FILE);
            run_predict(Path::new(record_path), artifacts_dir, history_file)?;
        }
        Some("history") => {
            let history_file = args
                .get(2)
                .map(String::as_str)
                .unwrap_or(DEFAULT_HISTORY_FILE);
            run_history(history_file)?;
        }
        _ => {
            eprintln!("Usage:");
            eprintln!("  diabetes-risk predict <patient.json> [artifacts_dir] [history.csv]");
            eprintln!("  diabetes-risk history [history.csv]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_predict(record_path: &Path, artifacts_dir: &str, history_file: &str) -> Result<()> {
    println!("🩺 Diabetes Risk Prediction v{}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load artifacts - startup-fatal on failure
    let artifacts = Artifacts::load(&ArtifactPaths::in_dir(artifacts_dir))
        .context("Artifact loading failed; refusing to serve predictions")?;
    println!("✓ Artifacts loaded from {}/", artifacts_dir);

    // 2. Read the patient record
    let content = fs::read_to_string(record_path)
        .with_context(|| format!("Failed to read patient file: {:?}", record_path))?;
    let record: PatientRecord =
        serde_json::from_str(&content).context("Failed to parse patient JSON")?;

    // 3. Bounds check before the pipeline sees the record
    if let Err(errors) = validate(&record) {
        eprintln!("❌ Patient record out of bounds:");
        for error in &errors {
            eprintln!("   - {}", error);
        }
        bail!("{} field(s) failed validation", errors.len());
    }

    // 4. Predict
    let prediction = match predict(&record, &artifacts) {
        Ok(prediction) => prediction,
        Err(e) => bail!("Prediction request failed ({} stage): {}", e.stage(), e),
    };

    // 5. Render verdict
    println!("\nResults");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    match prediction.label {
        RiskLabel::HighRisk => {
            println!(
                "⚠️  High diabetes risk ({:.1}% probability)",
                prediction.probability * 100.0
            );
            println!("\nMedical recommendations:");
            println!("  - Consult a physician promptly");
            println!("  - Adopt a balanced, controlled diet");
            println!("  - Exercise regularly");
            println!("  - Monitor blood glucose daily");
            println!("  - Avoid added sugars and refined carbohydrates");
        }
        RiskLabel::LowRisk => {
            println!(
                "✅ Low diabetes risk ({:.1}% probability)",
                prediction.probability * 100.0
            );
            println!("\nPrevention tips:");
            println!("  - Maintain a healthy weight");
            println!("  - At least 150 minutes of exercise per week");
            println!("  - Favor a fiber-rich diet");
            println!("  - Limit alcohol intake");
            println!("  - Schedule regular check-ups");
        }
    }

    // 6. Append to history (front-end concern; the pipeline never reads it)
    let log = HistoryLog::new(history_file);
    let entry = HistoryEntry::new(&record, &prediction, &artifacts.fingerprints.classifier);
    log.append(&entry)?;
    println!("\n✓ Logged to {}", history_file);

    Ok(())
}

fn run_history(history_file: &str) -> Result<()> {
    let log = HistoryLog::new(history_file);
    let entries = log.load()?;

    if entries.is_empty() {
        println!("No predictions logged yet ({})", history_file);
        return Ok(());
    }

    println!("📊 Prediction history ({} entries)", entries.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for entry in &entries {
        println!(
            "{}  {:<6}  {:>9}  {:.1}%",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.gender.as_str(),
            entry.label.as_str(),
            entry.probability * 100.0
        );
    }

    Ok(())
}
