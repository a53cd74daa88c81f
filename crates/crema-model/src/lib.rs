#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/crema/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod forest;
pub mod metrics;
pub mod split;
pub mod tree;

pub use error::{RegressorError, Result};
pub use forest::{ForestConfig, RandomForest};
pub use metrics::{RegressionMetrics, mean_absolute_error, r2_score, root_mean_squared_error};
pub use split::{SplitIndices, train_test_split};
pub use tree::{Node, RegressionTree, TreeConfig};

use ndarray::{Array1, Array2, ArrayView1};

/// Trait for fitted regressors over fixed-width feature vectors
pub trait Regressor {
    /// Input width the regressor was fitted on.
    fn n_features(&self) -> usize;

    /// Predict one value.
    ///
    /// # Errors
    /// `DimensionMismatch` when `x.len() != self.n_features()`.
    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64>;

    /// Predict one value per row of `x`.
    fn predict_batch(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features() {
            return Err(RegressorError::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        x.rows()
            .into_iter()
            .map(|row| self.predict(row))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from_vec)
    }
}
