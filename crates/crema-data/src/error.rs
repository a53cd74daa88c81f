//! Error types for data operations.

use crate::schema::AttributeKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Dataset file does not exist
    #[error("Dataset not found at {}", .0.display())]
    DatasetNotFound(PathBuf),

    /// One or more required columns are absent from a dataset
    #[error("Missing columns: {}", .columns.join(", "))]
    MissingColumns {
        /// Names of the absent columns
        columns: Vec<String>,
    },

    /// A record lacks a required attribute
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    /// An attribute holds a value of the wrong kind
    #[error("Attribute {attribute} must be {expected}")]
    WrongKind {
        /// Attribute name
        attribute: String,
        /// Kind the schema declares for it
        expected: AttributeKind,
    },

    /// A dataset cell is empty
    #[error("Null value in column {column} at row {row}")]
    NullValue {
        /// Column containing the null
        column: String,
        /// Zero-based row index
        row: usize,
    },

    /// A value lies outside the accepted domain
    #[error("{attribute} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Attribute name
        attribute: String,
        /// Offending value
        value: f64,
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether the error describes a schema violation (missing or mistyped data).
    pub const fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumns { .. }
                | Self::MissingAttribute(_)
                | Self::WrongKind { .. }
                | Self::NullValue { .. }
        )
    }
}
