//! Error types for feature encoding.

use crema_data::DataError;
use thiserror::Error;

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, EncoderError>;

/// Errors that can occur while fitting or applying the encoder
#[derive(Debug, Error)]
pub enum EncoderError {
    /// Not enough records to fit
    #[error("Insufficient data: need at least {required} records, got {actual}")]
    InsufficientData {
        /// Required number of records
        required: usize,
        /// Actual number of records
        actual: usize,
    },

    /// Record does not match the schema
    #[error("Schema error: {0}")]
    Schema(#[from] DataError),

    /// Numeric attribute holds NaN or infinity
    #[error("Non-finite value in numeric attribute {0}")]
    NonFinite(String),
}
