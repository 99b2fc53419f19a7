// 🔮 Inference Pipeline - validated record in, risk verdict out
// Fixed sequence: encode (column transformer) → scale (min-max) → classify
// (logistic regression) → interpret. Pure function of (record, artifacts);
// no mutation, no caching, no retries, no I/O.

use crate::artifacts::Artifacts;
use crate::error::PredictError;
use crate::record::{PatientRecord, Prediction, RiskLabel};

/// Produce a risk verdict with calibrated probability for one record.
///
/// The record is trusted to be in bounds (see `schema::validate`); the only
/// input problem detected here is a categorical value outside the fitted
/// vocabulary. Any failure aborts this single request with a typed error —
/// no default substitution, no retry.
pub fn predict(record: &PatientRecord, artifacts: &Artifacts) -> Result<Prediction, PredictError> {
    let features = artifacts.transformer.transform(record)?;
    let scaled = artifacts.scaler.transform(&features)?;

    let proba = artifacts.classifier.predict_proba(&scaled)?;
    let class = artifacts.classifier.predict(&scaled)?;

    Ok(Prediction {
        label: RiskLabel::from_class(class),
        probability: proba[1],
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{
        ArtifactFingerprints, CategoricalColumn, Classifier, ColumnTransformer, MinMaxScaler,
    };
    use crate::error::TransformError;
    use crate::record::{Gender, SmokingHistory};
    use std::sync::Arc;
    use std::thread;

    /// Same fitted values as the shipped artifacts/ files
    fn demo_artifacts() -> Artifacts {
        let transformer = ColumnTransformer {
            kind: ColumnTransformer::KIND.to_string(),
            version: 1,
            categorical: vec![
                CategoricalColumn {
                    field: "gender".to_string(),
                    categories: vec!["Female".to_string(), "Male".to_string()],
                },
                CategoricalColumn {
                    field: "smoking_history".to_string(),
                    categories: vec![
                        "No Info".to_string(),
                        "current".to_string(),
                        "ever".to_string(),
                        "former".to_string(),
                        "never".to_string(),
                        "not current".to_string(),
                    ],
                },
            ],
            passthrough: vec![
                "age".to_string(),
                "hypertension".to_string(),
                "heart_disease".to_string(),
                "bmi".to_string(),
                "HbA1c_level".to_string(),
                "blood_glucose_level".to_string(),
            ],
        };

        let scaler = MinMaxScaler {
            kind: MinMaxScaler::KIND.to_string(),
            version: 1,
            data_min: vec![
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 3.0, 80.0,
            ],
            data_max: vec![
                1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 100.0, 1.0, 1.0, 50.0, 9.0, 300.0,
            ],
        };

        let classifier = Classifier {
            kind: Classifier::KIND.to_string(),
            version: 1,
            coefficients: vec![
                -0.3127, 0.3127, -0.1042, 0.5873, 0.2944, 0.2105, -0.4288, 0.0936, 1.8342,
                0.7911, 0.7203, 1.5268, 4.4871, 3.5419,
            ],
            intercept: -6.0314,
        };

        Artifacts {
            transformer,
            scaler,
            classifier,
            fingerprints: ArtifactFingerprints {
                transformer: "test".to_string(),
                scaler: "test".to_string(),
                classifier: "test".to_string(),
            },
        }
    }

    fn low_risk_record() -> PatientRecord {
        PatientRecord {
            gender: Gender::Female,
            age: 45.0,
            hypertension: false,
            heart_disease: false,
            smoking_history: SmokingHistory::Never,
            bmi: 22.5,
            hba1c_level: 5.2,
            blood_glucose_level: 110,
        }
    }

    fn high_risk_record() -> PatientRecord {
        PatientRecord {
            gender: Gender::Male,
            age: 65.0,
            hypertension: true,
            heart_disease: true,
            smoking_history: SmokingHistory::Current,
            bmi: 34.0,
            hba1c_level: 8.5,
            blood_glucose_level: 260,
        }
    }

    #[test]
    fn test_low_risk_example() {
        let artifacts = demo_artifacts();
        let result = predict(&low_risk_record(), &artifacts).unwrap();
        assert_eq!(result.label, RiskLabel::LowRisk);
        assert!(result.probability < 0.5);
    }

    #[test]
    fn test_high_risk_example() {
        let artifacts = demo_artifacts();
        let result = predict(&high_risk_record(), &artifacts).unwrap();
        assert_eq!(result.label, RiskLabel::HighRisk);
        assert!(result.probability >= 0.5);
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let artifacts = demo_artifacts();
        for record in [low_risk_record(), high_risk_record()] {
            let result = predict(&record, &artifacts).unwrap();
            assert!(result.probability >= 0.0 && result.probability <= 1.0);
        }
    }

    #[test]
    fn test_label_consistent_with_threshold() {
        let artifacts = demo_artifacts();
        for record in [low_risk_record(), high_risk_record()] {
            let result = predict(&record, &artifacts).unwrap();
            let thresholded = if result.probability >= 0.5 {
                RiskLabel::HighRisk
            } else {
                RiskLabel::LowRisk
            };
            assert_eq!(result.label, thresholded);
        }
    }

    #[test]
    fn test_determinism() {
        let artifacts = demo_artifacts();
        let record = high_risk_record();
        let first = predict(&record, &artifacts).unwrap();
        let second = predict(&record, &artifacts).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unseen_category_fails_whole_request() {
        let mut artifacts = demo_artifacts();
        // Artifact fitted before "ever" appeared in the data
        artifacts.transformer.categorical[1].categories = vec![
            "never".to_string(),
            "No Info".to_string(),
            "current".to_string(),
            "former".to_string(),
        ];

        let mut record = low_risk_record();
        record.smoking_history = SmokingHistory::Ever;

        let err = predict(&record, &artifacts).unwrap_err();
        assert_eq!(err.stage(), "transform");
        assert!(matches!(
            err,
            PredictError::Transform(TransformError::UnseenCategory { .. })
        ));
    }

    #[test]
    fn test_width_disagreement_surfaces_as_transform_error() {
        let mut artifacts = demo_artifacts();
        artifacts.scaler.data_min.pop();
        artifacts.scaler.data_max.pop();

        let err = predict(&low_risk_record(), &artifacts).unwrap_err();
        assert!(matches!(
            err,
            PredictError::Transform(TransformError::WidthMismatch {
                expected: 13,
                found: 14,
            })
        ));
    }

    #[test]
    fn test_concurrent_calls_do_not_interfere() {
        let artifacts = Arc::new(demo_artifacts());

        let expected_low = predict(&low_risk_record(), &artifacts).unwrap();
        let expected_high = predict(&high_risk_record(), &artifacts).unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let artifacts = Arc::clone(&artifacts);
            handles.push(thread::spawn(move || {
                let record = if i % 2 == 0 {
                    low_risk_record()
                } else {
                    high_risk_record()
                };
                (i, predict(&record, &artifacts).unwrap())
            }));
        }

        for handle in handles {
            let (i, result) = handle.join().unwrap();
            if i % 2 == 0 {
                assert_eq!(result, expected_low);
            } else {
                assert_eq!(result, expected_high);
            }
        }
    }
}
