//! Standard scaling
//!
//! Centers a numeric column on its training mean and divides by its
//! population standard deviation:
//!
//! z = (x - mean) / std
//!
//! A constant column has std = 0; its scale is replaced by 1 so the column
//! encodes as `x - mean` instead of dividing by zero.

use serde::{Deserialize, Serialize};

/// Fitted scaling parameters for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    /// Column name
    pub column: String,
    /// Training mean
    pub mean: f64,
    /// Divisor (population std, or 1 for a constant column)
    pub scale: f64,
}

impl ScalerParams {
    /// Fit mean and scale over a column's training values.
    ///
    /// Callers guarantee `values` is non-empty and finite.
    pub fn fit(column: impl Into<String>, values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let scale = if std == 0.0 || !std.is_finite() {
            1.0
        } else {
            std
        };

        Self {
            column: column.into(),
            mean,
            scale,
        }
    }

    /// Standardize a single value.
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}
