//! Pipeline errors
//!
//! Component errors fold into one taxonomy at the pipeline boundary so
//! callers can tell a bad record from a missing model from a damaged
//! artifact without knowing which component failed.

use crema_data::DataError;
use crema_features::EncoderError;
use crema_model::RegressorError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors surfaced by training, persistence and inference
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing, misnamed or mistyped column or attribute
    #[error("Schema error: {0}")]
    Schema(String),

    /// Empty or too-small training set
    #[error("Insufficient data: need at least {required} records, got {actual}")]
    InsufficientData {
        /// Required number of records
        required: usize,
        /// Actual number of records
        actual: usize,
    },

    /// Encoded width differs from the regressor's input width
    #[error("Dimension mismatch: model expects {expected} features, got {actual}")]
    Dimension {
        /// Fitted input width
        expected: usize,
        /// Width supplied
        actual: usize,
    },

    /// No artifact at the location
    #[error("Artifact not found at {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Artifact exists but cannot be decoded into a valid pipeline
    #[error("Corrupt artifact at {}: {reason}", .path.display())]
    ArtifactCorrupt {
        /// Artifact location
        path: PathBuf,
        /// What failed
        reason: String,
    },

    /// Inference requested before a pipeline was available
    #[error("Model not loaded")]
    ModelNotLoaded,

    /// Training dataset file is absent
    #[error("Dataset not found at {}", .0.display())]
    DatasetNotFound(PathBuf),

    /// Values outside their domain, non-finite numbers, unreadable data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Invalid training or model configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Artifact encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DataError> for PipelineError {
    fn from(err: DataError) -> Self {
        if err.is_schema_error() {
            return Self::Schema(err.to_string());
        }
        match err {
            DataError::DatasetNotFound(path) => Self::DatasetNotFound(path),
            DataError::Io(e) => Self::Io(e),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

impl From<EncoderError> for PipelineError {
    fn from(err: EncoderError) -> Self {
        match err {
            EncoderError::InsufficientData { required, actual } => {
                Self::InsufficientData { required, actual }
            }
            EncoderError::Schema(e) => e.into(),
            EncoderError::NonFinite(_) => Self::InvalidData(err.to_string()),
        }
    }
}

impl From<RegressorError> for PipelineError {
    fn from(err: RegressorError) -> Self {
        match err {
            RegressorError::InsufficientData { required, actual } => {
                Self::InsufficientData { required, actual }
            }
            RegressorError::DimensionMismatch { expected, actual } => {
                Self::Dimension { expected, actual }
            }
            RegressorError::InvalidParameter(msg) => Self::InvalidConfig(msg),
            RegressorError::LengthMismatch { .. }
            | RegressorError::NonFinite(_)
            | RegressorError::InvalidModel(_) => Self::InvalidData(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
