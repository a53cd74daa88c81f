//! Export functionality for evaluation reports and batch predictions.
//!
//! CSV and JSON export through a single [`Exporter`] trait.

use crema_data::{AttributeValue, Record, Schema};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Pick a format from a file extension (`.csv` or `.json`, any case).
    ///
    /// JSON files are written pretty-printed.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::PrettyJson),
            _ => Err(ExportError::InvalidFormat(format!(
                "cannot infer export format from {}",
                path.display()
            ))),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Finish a CSV writer into a string.
pub(crate) fn csv_into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// One batch prediction with the input values that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRow {
    /// Zero-based position in the input file.
    pub row: usize,

    /// Attribute values, in the column order of the export.
    pub values: Vec<String>,

    /// Predicted price.
    pub predicted_price: f64,
}

/// Batch predictions ready for export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictionExport {
    /// Attribute column names.
    pub columns: Vec<String>,

    /// One row per input record.
    pub rows: Vec<PredictionRow>,
}

impl PredictionExport {
    /// Pair records with their predicted prices, in schema column order.
    ///
    /// Attributes absent from a record are exported as empty cells.
    pub fn from_records(
        schema: &Schema,
        records: &[Record],
        prices: &[f64],
    ) -> Result<Self, ExportError> {
        if records.len() != prices.len() {
            return Err(ExportError::InvalidFormat(format!(
                "{} records but {} predictions",
                records.len(),
                prices.len()
            )));
        }

        let columns: Vec<String> = schema.attributes().iter().map(|a| a.name.clone()).collect();
        let rows = records
            .iter()
            .zip(prices)
            .enumerate()
            .map(|(row, (record, &predicted_price))| PredictionRow {
                row,
                values: columns
                    .iter()
                    .map(|c| record.get(c).map(format_value).unwrap_or_default())
                    .collect(),
                predicted_price,
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Number of predictions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no predictions.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean predicted price, or `None` when empty.
    pub fn mean_price(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let sum: f64 = self.rows.iter().map(|r| r.predicted_price).sum();
        Some(sum / self.rows.len() as f64)
    }
}

fn format_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Numeric(v) => v.to_string(),
        AttributeValue::Category(s) => s.clone(),
    }
}

impl Exporter for PredictionExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);

                let mut header = vec!["row"];
                header.extend(self.columns.iter().map(String::as_str));
                header.push("predicted_price");
                wtr.write_record(&header)?;

                for row in &self.rows {
                    if row.values.len() != self.columns.len() {
                        return Err(ExportError::InvalidFormat(format!(
                            "row {} has {} values for {} columns",
                            row.row,
                            row.values.len(),
                            self.columns.len()
                        )));
                    }
                    let mut fields = vec![row.row.to_string()];
                    fields.extend(row.values.iter().cloned());
                    fields.push(format!("{:.2}", row.predicted_price));
                    wtr.write_record(&fields)?;
                }
                csv_into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
