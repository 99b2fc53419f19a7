// 📦 Artifacts - Pre-fitted preprocessing and classifier objects as data
// Three JSON files produced by the training side: a column transformer
// (one-hot + passthrough), a min-max scaler, and a logistic regression
// classifier. Loaded once at startup, held immutably for the process
// lifetime, shared read-only across requests.

use crate::error::{ArtifactLoadError, PredictionError, TransformError};
use crate::record::PatientRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// COLUMN TRANSFORMER
// ============================================================================

/// One categorical column with the vocabulary it was fitted on,
/// in fitted order (one output column per category).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub field: String,
    pub categories: Vec<String>,
}

/// Fitted column transformer: one-hot encodes the categorical columns,
/// then passes numeric columns through, in fitted column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    pub kind: String,
    pub version: u32,
    pub categorical: Vec<CategoricalColumn>,
    pub passthrough: Vec<String>,
}

impl ColumnTransformer {
    pub const KIND: &'static str = "column_transformer";

    /// Width of the feature vector this transformer emits
    pub fn output_width(&self) -> usize {
        let encoded: usize = self.categorical.iter().map(|c| c.categories.len()).sum();
        encoded + self.passthrough.len()
    }

    /// Encode a record into the fixed-width numeric feature vector.
    /// Categorical values outside the fitted vocabulary fail the request.
    pub fn transform(&self, record: &PatientRecord) -> Result<Vec<f64>, TransformError> {
        let mut features = Vec::with_capacity(self.output_width());

        for column in &self.categorical {
            let value = record
                .categorical(&column.field)
                .ok_or_else(|| TransformError::UnknownField {
                    field: column.field.clone(),
                })?;

            let hit = column.categories.iter().position(|c| c == value);
            match hit {
                Some(index) => {
                    for i in 0..column.categories.len() {
                        features.push(if i == index { 1.0 } else { 0.0 });
                    }
                }
                None => {
                    return Err(TransformError::UnseenCategory {
                        field: column.field.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }

        for field in &self.passthrough {
            let value = record
                .numeric(field)
                .ok_or_else(|| TransformError::UnknownField {
                    field: field.clone(),
                })?;
            features.push(value);
        }

        Ok(features)
    }
}

// ============================================================================
// MIN-MAX SCALER
// ============================================================================

/// Fitted min-max scaler: rescales each feature by the range learned at
/// fit time, `(x - min) / (max - min)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub kind: String,
    pub version: u32,
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl MinMaxScaler {
    pub const KIND: &'static str = "min_max_scaler";

    pub fn width(&self) -> usize {
        self.data_min.len()
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, TransformError> {
        if features.len() != self.width() {
            return Err(TransformError::WidthMismatch {
                expected: self.width(),
                found: features.len(),
            });
        }

        let scaled = features
            .iter()
            .zip(self.data_min.iter().zip(self.data_max.iter()))
            .map(|(&x, (&min, &max))| {
                let span = max - min;
                // Constant feature at fit time: scales to 0.0
                if span == 0.0 {
                    0.0
                } else {
                    (x - min) / span
                }
            })
            .collect();

        Ok(scaled)
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Fitted logistic regression over the scaled feature vector.
/// Class 0 = low risk, class 1 = high risk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    pub kind: String,
    pub version: u32,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Classifier {
    pub const KIND: &'static str = "logistic_regression";

    pub fn width(&self) -> usize {
        self.coefficients.len()
    }

    /// Class probabilities `[p0, p1]` for the scaled vector
    pub fn predict_proba(&self, scaled: &[f64]) -> Result<[f64; 2], PredictionError> {
        if scaled.len() != self.width() {
            return Err(PredictionError::WidthMismatch {
                expected: self.width(),
                found: scaled.len(),
            });
        }

        let z: f64 = self
            .coefficients
            .iter()
            .zip(scaled.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        if !z.is_finite() {
            return Err(PredictionError::NonFiniteScore { score: z });
        }

        let p1 = sigmoid(z);
        Ok([1.0 - p1, p1])
    }

    /// Native decision rule: class 1 iff p1 >= 0.5
    pub fn predict(&self, scaled: &[f64]) -> Result<u8, PredictionError> {
        let proba = self.predict_proba(scaled)?;
        Ok(if proba[1] >= 0.5 { 1 } else { 0 })
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

// ============================================================================
// ARTIFACT SET
// ============================================================================

/// Locations of the three artifact files
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub transformer: PathBuf,
    pub scaler: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPaths {
    /// Conventional file names inside an artifacts directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        ArtifactPaths {
            transformer: dir.join("transformer.json"),
            scaler: dir.join("scaler.json"),
            classifier: dir.join("classifier.json"),
        }
    }
}

/// SHA-256 of each artifact file as loaded, for provenance (history log,
/// startup log lines)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFingerprints {
    pub transformer: String,
    pub scaler: String,
    pub classifier: String,
}

/// The loaded, immutable artifact set. No interior mutability: a shared
/// reference may serve any number of concurrent predictions.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub transformer: ColumnTransformer,
    pub scaler: MinMaxScaler,
    pub classifier: Classifier,
    pub fingerprints: ArtifactFingerprints,
}

impl Artifacts {
    /// Load all three artifacts, or fail startup. Checks each file's kind
    /// tag, the scaler's internal shape, and that the three artifacts agree
    /// on feature width, so an incompatible set fails here instead of at
    /// the first request.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactLoadError> {
        let (transformer, transformer_fp): (ColumnTransformer, String) =
            load_artifact(&paths.transformer, ColumnTransformer::KIND)?;
        let (scaler, scaler_fp): (MinMaxScaler, String) =
            load_artifact(&paths.scaler, MinMaxScaler::KIND)?;
        let (classifier, classifier_fp): (Classifier, String) =
            load_artifact(&paths.classifier, Classifier::KIND)?;

        if scaler.data_min.len() != scaler.data_max.len() {
            return Err(ArtifactLoadError::Incompatible {
                path: paths.scaler.clone(),
                message: format!(
                    "data_min has {} entries but data_max has {}",
                    scaler.data_min.len(),
                    scaler.data_max.len()
                ),
            });
        }

        let widths = (
            transformer.output_width(),
            scaler.width(),
            classifier.width(),
        );
        if widths.0 != widths.1 || widths.1 != widths.2 {
            return Err(ArtifactLoadError::Inconsistent {
                message: format!(
                    "feature widths disagree: transformer {} / scaler {} / classifier {}",
                    widths.0, widths.1, widths.2
                ),
            });
        }

        log::info!(
            "loaded transformer {} (width {}, sha256 {})",
            paths.transformer.display(),
            transformer.output_width(),
            &transformer_fp[..12]
        );
        log::info!(
            "loaded scaler {} (width {}, sha256 {})",
            paths.scaler.display(),
            scaler.width(),
            &scaler_fp[..12]
        );
        log::info!(
            "loaded classifier {} (width {}, sha256 {})",
            paths.classifier.display(),
            classifier.width(),
            &classifier_fp[..12]
        );

        Ok(Artifacts {
            transformer,
            scaler,
            classifier,
            fingerprints: ArtifactFingerprints {
                transformer: transformer_fp,
                scaler: scaler_fp,
                classifier: classifier_fp,
            },
        })
    }
}

/// Read one artifact file, fingerprint it, deserialize it, check its kind tag
fn load_artifact<T>(path: &Path, expected_kind: &str) -> Result<(T, String), ArtifactLoadError>
where
    T: serde::de::DeserializeOwned + HasKind,
{
    let bytes = fs::read(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let fingerprint = format!("{:x}", hasher.finalize());

    let artifact: T = serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if artifact.kind() != expected_kind {
        return Err(ArtifactLoadError::Incompatible {
            path: path.to_path_buf(),
            message: format!(
                "expected kind {:?}, found {:?}",
                expected_kind,
                artifact.kind()
            ),
        });
    }

    Ok((artifact, fingerprint))
}

/// Kind tag accessor for the generic loader
trait HasKind {
    fn kind(&self) -> &str;
}

impl HasKind for ColumnTransformer {
    fn kind(&self) -> &str {
        &self.kind
    }
}

impl HasKind for MinMaxScaler {
    fn kind(&self) -> &str {
        &self.kind
    }
}

impl HasKind for Classifier {
    fn kind(&self) -> &str {
        &self.kind
    }
}

// ============================================================================
// TESTS
// ============================================================================
