//! Error types for the regressor.

use thiserror::Error;

/// Result type for regressor operations.
pub type Result<T> = std::result::Result<T, RegressorError>;

/// Errors that can occur while fitting, evaluating or applying a regressor
#[derive(Debug, Error)]
pub enum RegressorError {
    /// Too few samples
    #[error("Insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData {
        /// Required number of samples
        required: usize,
        /// Actual number of samples
        actual: usize,
    },

    /// Feature rows and targets differ in count
    #[error("Length mismatch: {features} feature rows but {targets} targets")]
    LengthMismatch {
        /// Number of feature rows
        features: usize,
        /// Number of targets
        targets: usize,
    },

    /// Input width differs from the fitted width
    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch {
        /// Fitted input width
        expected: usize,
        /// Width supplied
        actual: usize,
    },

    /// Training data contains NaN or infinity
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Deserialized model violates structural invariants
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}
