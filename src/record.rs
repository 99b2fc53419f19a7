// 🩺 Patient Record - Core data model
// One record per prediction request: built by a front end, consumed once,
// discarded. Field names and category spellings follow the training dataset.

use serde::{Deserialize, Serialize};

// ============================================================================
// GENDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Dataset spelling, as the transformer vocabulary stores it
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

// ============================================================================
// SMOKING HISTORY
// ============================================================================

/// Smoking history categories from the training dataset. The odd spellings
/// ("No Info", "not current") are the dataset's own and must round-trip
/// exactly, since the transformer vocabulary was fitted on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingHistory {
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "No Info")]
    NoInfo,
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "former")]
    Former,
    #[serde(rename = "not current")]
    NotCurrent,
    #[serde(rename = "ever")]
    Ever,
}

impl SmokingHistory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingHistory::Never => "never",
            SmokingHistory::NoInfo => "No Info",
            SmokingHistory::Current => "current",
            SmokingHistory::Former => "former",
            SmokingHistory::NotCurrent => "not current",
            SmokingHistory::Ever => "ever",
        }
    }
}

// ============================================================================
// PATIENT RECORD
// ============================================================================

/// Fully-populated biometrics for one prediction request.
///
/// Bounds (age 0-140, bmi 10-50, HbA1c 3-9, glucose 80-300) are the
/// collecting layer's responsibility and are checked by `schema::validate`
/// before the record reaches the pipeline. The pipeline itself only detects
/// categories outside the fitted vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub gender: Gender,
    pub age: f64,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub smoking_history: SmokingHistory,
    pub bmi: f64,
    #[serde(rename = "HbA1c_level")]
    pub hba1c_level: f64,
    pub blood_glucose_level: i64,
}

impl PatientRecord {
    /// Look up a categorical field by its dataset column name.
    /// Returns `None` for names this record does not carry.
    pub fn categorical(&self, field: &str) -> Option<&'static str> {
        match field {
            "gender" => Some(self.gender.as_str()),
            "smoking_history" => Some(self.smoking_history.as_str()),
            _ => None,
        }
    }

    /// Look up a numeric (passthrough) field by its dataset column name.
    /// Booleans are encoded 0.0/1.0, matching the dataset's 0/1 columns.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "age" => Some(self.age),
            "hypertension" => Some(if self.hypertension { 1.0 } else { 0.0 }),
            "heart_disease" => Some(if self.heart_disease { 1.0 } else { 0.0 }),
            "bmi" => Some(self.bmi),
            "HbA1c_level" => Some(self.hba1c_level),
            "blood_glucose_level" => Some(self.blood_glucose_level as f64),
            _ => None,
        }
    }
}

// ============================================================================
// PREDICTION RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    LowRisk,
    HighRisk,
}

impl RiskLabel {
    /// Map the classifier's class index (0 = low, 1 = high)
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "low_risk",
            RiskLabel::HighRisk => "high_risk",
        }
    }
}

/// Risk verdict for one record. Produced fresh per call; the pipeline
/// retains nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: RiskLabel,

    /// Positive-class probability, verbatim from the classifier (no re-scaling)
    pub probability: f64,
}

// ============================================================================
// TESTS
// ============================================================================
