// 📐 Bounds Validation - Collecting-layer contract
// Every field must be present and within its declared bound before a record
// is handed to the pipeline. Form widgets normally enforce this; front ends
// run this check so a hand-built record (CLI JSON, API payload) gets the
// same guarantee.

use crate::record::PatientRecord;

// ============================================================================
// DECLARED BOUNDS
// ============================================================================

pub const AGE_RANGE: (f64, f64) = (0.0, 140.0);
pub const BMI_RANGE: (f64, f64) = (10.0, 50.0);
pub const HBA1C_RANGE: (f64, f64) = (3.0, 9.0);
pub const GLUCOSE_RANGE: (i64, i64) = (80, 300);

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// VALIDATOR
// ============================================================================

/// Check every bound and collect all violations, so a form can flag
/// every bad field at once instead of one per submission.
pub fn validate(record: &PatientRecord) -> ValidationResult {
    let mut errors = Vec::new();

    check_float_range(&mut errors, "age", record.age, AGE_RANGE);
    check_float_range(&mut errors, "bmi", record.bmi, BMI_RANGE);
    check_float_range(&mut errors, "HbA1c_level", record.hba1c_level, HBA1C_RANGE);

    let (glucose_min, glucose_max) = GLUCOSE_RANGE;
    if record.blood_glucose_level < glucose_min || record.blood_glucose_level > glucose_max {
        errors.push(ValidationError {
            field: "blood_glucose_level".to_string(),
            message: format!(
                "Must be between {} and {}, got {}",
                glucose_min, glucose_max, record.blood_glucose_level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_float_range(
    errors: &mut Vec<ValidationError>,
    field: &str,
    value: f64,
    (min, max): (f64, f64),
) {
    if !value.is_finite() {
        errors.push(ValidationError {
            field: field.to_string(),
            message: format!("Must be a finite number, got {}", value),
        });
    } else if value < min || value > max {
        errors.push(ValidationError {
            field: field.to_string(),
            message: format!("Must be between {} and {}, got {}", min, max, value),
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================
