// ⚠️ Error Taxonomy - Typed failures at the pipeline boundary
// Three families: artifact loading (startup-fatal), transform (per-request),
// prediction (per-request, opaque artifact failure). Never retried.

use std::fmt;
use std::io;
use std::path::PathBuf;

// ============================================================================
// ARTIFACT LOAD ERRORS (startup-fatal)
// ============================================================================

/// Failure while loading one of the three pre-fitted artifacts.
/// The process must not serve predictions after seeing one of these.
#[derive(Debug)]
pub enum ArtifactLoadError {
    /// File missing or unreadable
    Io { path: PathBuf, source: io::Error },

    /// File read but not valid JSON for the expected shape
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// File parsed but is not the artifact we expected (wrong kind tag,
    /// or internally inconsistent, e.g. min/max vectors of different lengths)
    Incompatible { path: PathBuf, message: String },

    /// The three artifacts disagree with each other (feature widths)
    Inconsistent { message: String },
}

impl fmt::Display for ArtifactLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read artifact {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse artifact {}: {}", path.display(), source)
            }
            Self::Incompatible { path, message } => {
                write!(f, "incompatible artifact {}: {}", path.display(), message)
            }
            Self::Inconsistent { message } => {
                write!(f, "inconsistent artifact set: {}", message)
            }
        }
    }
}

impl std::error::Error for ArtifactLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// TRANSFORM ERRORS (per-request)
// ============================================================================

/// Failure in the encode or scale stage, caused by the input record
/// (or by a vector that does not fit the fitted shapes).
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Categorical value outside the vocabulary the transformer was fitted on
    UnseenCategory { field: String, value: String },

    /// Artifact references a field the record does not carry
    UnknownField { field: String },

    /// Vector width does not match what the fitted artifact expects
    WidthMismatch { expected: usize, found: usize },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnseenCategory { field, value } => {
                write!(f, "unseen category for {}: {:?}", field, value)
            }
            Self::UnknownField { field } => {
                write!(f, "artifact references unknown field: {}", field)
            }
            Self::WidthMismatch { expected, found } => {
                write!(f, "feature width mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for TransformError {}

// ============================================================================
// PREDICTION ERRORS (per-request, opaque)
// ============================================================================

/// Failure inside the classifier's forward pass. Treated as opaque and
/// fatal for that single request.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// Scaled vector width does not match the classifier coefficients
    WidthMismatch { expected: usize, found: usize },

    /// Forward pass produced a non-finite score
    NonFiniteScore { score: f64 },
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidthMismatch { expected, found } => {
                write!(f, "classifier width mismatch: expected {}, found {}", expected, found)
            }
            Self::NonFiniteScore { score } => {
                write!(f, "classifier produced non-finite score: {}", score)
            }
        }
    }
}

impl std::error::Error for PredictionError {}

// ============================================================================
// PREDICT ERROR (union surfaced by the pipeline)
// ============================================================================

/// Everything `pipeline::predict` can fail with. Names the failing stage
/// so front ends can report it without inspecting the inner error.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    Transform(TransformError),
    Prediction(PredictionError),
}

impl PredictError {
    /// Stage name for logging and API payloads
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Transform(_) => "transform",
            Self::Prediction(_) => "prediction",
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform(e) => write!(f, "transform stage failed: {}", e),
            Self::Prediction(e) => write!(f, "prediction stage failed: {}", e),
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transform(e) => Some(e),
            Self::Prediction(e) => Some(e),
        }
    }
}

impl From<TransformError> for PredictError {
    fn from(e: TransformError) -> Self {
        Self::Transform(e)
    }
}

impl From<PredictionError> for PredictError {
    fn from(e: PredictionError) -> Self {
        Self::Prediction(e)
    }
}

// ============================================================================
// TESTS
// ============================================================================
