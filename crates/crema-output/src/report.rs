//! Evaluation report for a training run.

use crate::export::{ExportError, ExportFormat, Exporter, csv_into_string};
use chrono::{DateTime, Utc};
use crema_model::RegressionMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required field was never set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Held-out evaluation of a trained pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationReport {
    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Training dataset.
    pub dataset: PathBuf,

    /// Saved artifact location.
    pub model_path: PathBuf,

    /// Training rows.
    pub n_train: usize,

    /// Held-out rows.
    pub n_test: usize,

    /// Held-out scores.
    pub metrics: RegressionMetrics,

    /// Number of trees in the forest.
    pub num_trees: usize,

    /// Encoded feature names.
    pub feature_names: Vec<String>,
}

impl EvaluationReport {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the report as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nModel Evaluation: {}\n", self.dataset.display()));
        output.push_str(&format!(
            "Generated: {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output.push_str(&format!("{:<28} {:>30}\n", "Training rows", self.n_train));
        output.push_str(&format!("{:<28} {:>30}\n", "Held-out rows", self.n_test));
        output.push_str(&format!("{:<28} {:>30}\n", "Trees", self.num_trees));
        output.push_str(&format!(
            "{:<28} {:>30}\n",
            "Encoded features",
            self.feature_names.len()
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        output.push_str(&format!(
            "{:<28} {:>30.2}\n",
            "Mean Absolute Error", self.metrics.mae
        ));
        output.push_str(&format!(
            "{:<28} {:>30.2}\n",
            "Root Mean Squared Error", self.metrics.rmse
        ));
        output.push_str(&format!("{:<28} {:>30.4}\n", "R-squared", self.metrics.r2));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Model saved to {}\n", self.model_path.display()));

        output
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAE {:.2}, RMSE {:.2}, R2 {:.4} on {} held-out rows",
            self.metrics.mae, self.metrics.rmse, self.metrics.r2, self.n_test
        )
    }
}

/// Flattened report line for CSV export.
#[derive(Debug, Serialize)]
struct MetricLine<'a> {
    metric: &'a str,
    value: f64,
}

impl Exporter for EvaluationReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let lines = [
                    ("mae", self.metrics.mae),
                    ("rmse", self.metrics.rmse),
                    ("r2", self.metrics.r2),
                    ("n_train", self.n_train as f64),
                    ("n_test", self.n_test as f64),
                    ("num_trees", self.num_trees as f64),
                ];
                let mut wtr = csv::Writer::from_writer(vec![]);
                for (metric, value) in lines {
                    wtr.serialize(MetricLine { metric, value })?;
                }
                csv_into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Builder for evaluation reports.
#[derive(Debug, Default)]
pub struct EvaluationReportBuilder {
    dataset: Option<PathBuf>,
    model_path: Option<PathBuf>,
    split: Option<(usize, usize)>,
    metrics: Option<RegressionMetrics>,
    num_trees: usize,
    feature_names: Vec<String>,
}

impl EvaluationReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the training dataset.
    pub fn dataset(mut self, dataset: impl Into<PathBuf>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    /// Set the artifact location.
    pub fn model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(model_path.into());
        self
    }

    /// Set the train/test sizes.
    pub const fn split(mut self, n_train: usize, n_test: usize) -> Self {
        self.split = Some((n_train, n_test));
        self
    }

    /// Set the held-out scores.
    pub const fn metrics(mut self, metrics: RegressionMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Set the forest size.
    pub const fn num_trees(mut self, num_trees: usize) -> Self {
        self.num_trees = num_trees;
        self
    }

    /// Set the encoded feature names.
    pub fn feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }

    /// Build the report.
    ///
    /// # Errors
    /// `MissingField` when the metrics or split sizes were not set.
    pub fn build(self) -> Result<EvaluationReport, ReportError> {
        let metrics = self.metrics.ok_or(ReportError::MissingField("metrics"))?;
        let (n_train, n_test) = self.split.ok_or(ReportError::MissingField("split"))?;

        Ok(EvaluationReport {
            timestamp: Utc::now(),
            dataset: self.dataset.unwrap_or_default(),
            model_path: self.model_path.unwrap_or_default(),
            n_train,
            n_test,
            metrics,
            num_trees: self.num_trees,
            feature_names: self.feature_names,
        })
    }
}
