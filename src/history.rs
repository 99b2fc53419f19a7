// 🗂️ Prediction History - CSV append of served predictions
// Front-end collaborator concern: the pipeline never reads this. One row per
// served prediction, with the classifier fingerprint so old rows stay
// attributable after an artifact swap.

use crate::record::{Gender, PatientRecord, Prediction, RiskLabel, SmokingHistory};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

// ============================================================================
// HISTORY ENTRY
// ============================================================================

/// One served prediction: inputs, verdict, and provenance
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,

    // Inputs as submitted
    pub gender: Gender,
    pub age: f64,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub smoking_history: SmokingHistory,
    pub bmi: f64,
    #[serde(rename = "HbA1c_level")]
    pub hba1c_level: f64,
    pub blood_glucose_level: i64,

    // Verdict
    pub label: RiskLabel,
    pub probability: f64,

    /// SHA-256 of the classifier artifact that produced this row
    pub classifier_fingerprint: String,
}

impl HistoryEntry {
    pub fn new(
        record: &PatientRecord,
        prediction: &Prediction,
        classifier_fingerprint: &str,
    ) -> Self {
        HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            gender: record.gender,
            age: record.age,
            hypertension: record.hypertension,
            heart_disease: record.heart_disease,
            smoking_history: record.smoking_history,
            bmi: record.bmi,
            hba1c_level: record.hba1c_level,
            blood_glucose_level: record.blood_glucose_level,
            label: prediction.label,
            probability: prediction.probability,
            classifier_fingerprint: classifier_fingerprint.to_string(),
        }
    }
}

// ============================================================================
// HISTORY LOG
// ============================================================================

/// Append-only CSV log. Creates the file with a header row on first append.
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        HistoryLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, writing the header only when the file is new
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        let is_new = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file: {:?}", self.path))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);

        writer
            .serialize(entry)
            .context("Failed to serialize history entry")?;
        writer.flush().context("Failed to flush history file")?;

        Ok(())
    }

    /// Load the full history, oldest first. Missing file is an empty history.
    pub fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open history file: {:?}", self.path))?;

        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let entry: HistoryEntry = result.context("Failed to deserialize history entry")?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_entry(probability: f64) -> HistoryEntry {
        let record = PatientRecord {
            gender: Gender::Male,
            age: 65.0,
            hypertension: true,
            heart_disease: true,
            smoking_history: SmokingHistory::Current,
            bmi: 34.0,
            hba1c_level: 8.5,
            blood_glucose_level: 260,
        };
        let prediction = Prediction {
            label: if probability >= 0.5 {
                RiskLabel::HighRisk
            } else {
                RiskLabel::LowRisk
            },
            probability,
        };
        HistoryEntry::new(&record, &prediction, "abc123")
    }

    fn temp_log() -> HistoryLog {
        let path = std::env::temp_dir().join(format!("history-test-{}.csv", uuid::Uuid::new_v4()));
        HistoryLog::new(path)
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let log = temp_log();
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_load_round_trip() {
        let log = temp_log();

        log.append(&sample_entry(0.93)).unwrap();
        log.append(&sample_entry(0.12)).unwrap();

        let entries = log.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, RiskLabel::HighRisk);
        assert_eq!(entries[1].label, RiskLabel::LowRisk);
        assert_eq!(entries[0].smoking_history, SmokingHistory::Current);
        assert_eq!(entries[0].classifier_fingerprint, "abc123");

        fs::remove_file(log.path()).unwrap();
    }

    #[test]
    fn test_header_written_once() {
        let log = temp_log();

        log.append(&sample_entry(0.6)).unwrap();
        log.append(&sample_entry(0.7)).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let header_lines = content
            .lines()
            .filter(|line| line.starts_with("id,timestamp"))
            .count();
        assert_eq!(header_lines, 1);

        fs::remove_file(log.path()).unwrap();
    }
}
