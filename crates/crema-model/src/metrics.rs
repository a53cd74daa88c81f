//! Regression metrics
//!
//! MAE  = (1/n) Σ |y_i - ŷ_i|
//! RMSE = sqrt((1/n) Σ (y_i - ŷ_i)²)
//! R²   = 1 - SS_res / SS_tot
//!
//! When the targets are constant (SS_tot = 0), R² is 1.0 for a perfect fit
//! and 0.0 otherwise.

use crate::error::{RegressorError, Result};
use serde::{Deserialize, Serialize};

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(RegressorError::LengthMismatch {
            features: y_pred.len(),
            targets: y_true.len(),
        });
    }
    if y_true.is_empty() {
        return Err(RegressorError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(())
}

/// Mean absolute error.
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs())
        .sum();
    Ok(sum / y_true.len() as f64)
}

/// Root mean squared error.
pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    Ok((sum / y_true.len() as f64).sqrt())
}

/// Coefficient of determination.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Held-out evaluation scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Number of evaluated samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Score predictions against known targets.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self> {
        Ok(Self {
            mae: mean_absolute_error(y_true, y_pred)?,
            rmse: root_mean_squared_error(y_true, y_pred)?,
            r2: r2_score(y_true, y_pred)?,
            n_samples: y_true.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_values() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];

        assert_relative_eq!(mean_absolute_error(&y_true, &y_pred).unwrap(), 0.5);
        assert_relative_eq!(
            root_mean_squared_error(&y_true, &y_pred).unwrap(),
            0.375_f64.sqrt()
        );
        assert_relative_eq!(
            r2_score(&y_true, &y_pred).unwrap(),
            0.948_608_137,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_constant_targets() {
        assert_eq!(r2_score(&[2.0, 2.0], &[2.0, 2.0]).unwrap(), 1.0);
        assert_eq!(r2_score(&[2.0, 2.0], &[1.0, 3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_mismatch_and_empty() {
        assert!(matches!(
            mean_absolute_error(&[1.0], &[1.0, 2.0]),
            Err(RegressorError::LengthMismatch { .. })
        ));
        assert!(matches!(
            RegressionMetrics::compute(&[], &[]),
            Err(RegressorError::InsufficientData { .. })
        ));
    }
}
