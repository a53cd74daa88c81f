//! Random Forest Regressor
//!
//! Bagged ensemble of regression trees. Tree `t` draws its bootstrap sample
//! and its per-split feature order from `ChaCha8Rng::seed_from_u64(seed + t)`,
//! so a forest is a pure function of (config, X, y).
//!
//! prediction(x) = (1 / T) * Σ_t tree_t(x)

use crate::Regressor;
use crate::error::{RegressorError, Result};
use crate::tree::{RegressionTree, TreeConfig};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Smallest training set a forest accepts.
pub const MIN_SAMPLES: usize = 2;

/// Random forest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees (default: 100)
    pub num_trees: usize,

    /// Maximum tree depth (default: unlimited)
    pub max_depth: Option<usize>,

    /// Minimum samples required to split a node (default: 2)
    pub min_samples_split: usize,

    /// Minimum samples per leaf (default: 1)
    pub min_samples_leaf: usize,

    /// Features considered per split (default: all)
    pub max_features: Option<usize>,

    /// Train each tree on a bootstrap resample (default: true)
    pub bootstrap: bool,

    /// Seed for resampling and split feature order (default: 42)
    pub random_seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            random_seed: 42,
        }
    }
}

impl ForestConfig {
    /// Reject parameter values that cannot grow a forest.
    pub fn validate(&self) -> Result<()> {
        if self.num_trees == 0 {
            return Err(RegressorError::InvalidParameter(
                "num_trees must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(RegressorError::InvalidParameter(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(RegressorError::InvalidParameter(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(RegressorError::InvalidParameter(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(RegressorError::InvalidParameter(
                "max_features must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }
}

/// Fitted random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Fit a forest on feature matrix `x` (N x K) and targets `y` (N).
    ///
    /// # Errors
    /// * `InvalidParameter` for an invalid config
    /// * `LengthMismatch` when `x.nrows() != y.len()`
    /// * `InsufficientData` for fewer than [`MIN_SAMPLES`] rows
    /// * `NonFinite` when `x` or `y` holds NaN or infinity
    pub fn fit(config: ForestConfig, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        config.validate()?;

        let (n_samples, n_features) = x.dim();
        if n_samples != y.len() {
            return Err(RegressorError::LengthMismatch {
                features: n_samples,
                targets: y.len(),
            });
        }
        if n_samples < MIN_SAMPLES {
            return Err(RegressorError::InsufficientData {
                required: MIN_SAMPLES,
                actual: n_samples,
            });
        }
        if !x.iter().all(|v| v.is_finite()) {
            return Err(RegressorError::NonFinite("features"));
        }
        if !y.iter().all(|v| v.is_finite()) {
            return Err(RegressorError::NonFinite("targets"));
        }

        let tree_config = config.tree_config();
        let mut trees = Vec::with_capacity(config.num_trees);

        for t in 0..config.num_trees {
            let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed.wrapping_add(t as u64));

            let mut indices: Vec<usize> = if config.bootstrap {
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
            } else {
                (0..n_samples).collect()
            };

            let tree =
                RegressionTree::fit_indices(&tree_config, x.view(), y.view(), &mut indices, &mut rng);
            debug!(
                "Tree {}: {} nodes, {} leaves, depth {}",
                t,
                tree.nodes().len(),
                tree.n_leaves(),
                tree.depth()
            );
            trees.push(tree);
        }

        info!(
            "Fitted random forest: {} trees on {} samples x {} features",
            trees.len(),
            n_samples,
            n_features
        );

        Ok(Self {
            config,
            trees,
            n_features,
        })
    }

    /// Configuration used to fit the forest.
    pub const fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Check that every tree is structurally sound for this input width.
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(RegressorError::InvalidModel("forest has no trees".to_string()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != self.n_features {
                return Err(RegressorError::InvalidModel(format!(
                    "tree {t} expects {} features, forest expects {}",
                    tree.n_features(),
                    self.n_features
                )));
            }
            tree.validate()?;
        }
        Ok(())
    }
}

impl Regressor for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: ArrayView1<'_, f64>) -> Result<f64> {
        if x.len() != self.n_features {
            return Err(RegressorError::DimensionMismatch {
                expected: self.n_features,
                actual: x.len(),
            });
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict_unchecked(x)).sum();
        Ok(sum / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    fn linear_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 {
                i as f64
            } else {
                ((i * 31) % 7) as f64
            }
        });
        let y = Array1::from_shape_fn(n, |i| 3.0 * i as f64 + 10.0);
        (x, y)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            num_trees: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_forest_config_default() {
        let config = ForestConfig::default();
        assert_eq!(config.num_trees, 100);
        assert_eq!(config.max_depth, None);
        assert_eq!(config.random_seed, 42);
        assert!(config.bootstrap);
    }

    #[rstest]
    #[case::no_trees(ForestConfig { num_trees: 0, ..Default::default() })]
    #[case::zero_depth(ForestConfig { max_depth: Some(0), ..Default::default() })]
    #[case::tiny_split(ForestConfig { min_samples_split: 1, ..Default::default() })]
    #[case::empty_leaf(ForestConfig { min_samples_leaf: 0, ..Default::default() })]
    #[case::no_features(ForestConfig { max_features: Some(0), ..Default::default() })]
    fn test_invalid_config(#[case] config: ForestConfig) {
        let (x, y) = linear_data(10);
        assert!(matches!(
            RandomForest::fit(config, &x, &y),
            Err(RegressorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_insufficient_data() {
        let x = array![[1.0, 2.0]];
        let y = array![5.0];
        assert!(matches!(
            RandomForest::fit(small_config(), &x, &y),
            Err(RegressorError::InsufficientData {
                required: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let (x, _) = linear_data(10);
        let y = Array1::zeros(9);
        assert!(matches!(
            RandomForest::fit(small_config(), &x, &y),
            Err(RegressorError::LengthMismatch {
                features: 10,
                targets: 9
            })
        ));
    }

    #[test]
    fn test_non_finite_target() {
        let (x, mut y) = linear_data(10);
        y[3] = f64::INFINITY;
        assert!(matches!(
            RandomForest::fit(small_config(), &x, &y),
            Err(RegressorError::NonFinite("targets"))
        ));
    }

    #[test]
    fn test_prediction_is_tree_mean() {
        let (x, y) = linear_data(30);
        let forest = RandomForest::fit(small_config(), &x, &y).unwrap();
        let probe = array![12.0, 3.0];

        let mean = forest
            .trees()
            .iter()
            .map(|t| t.predict(probe.view()).unwrap())
            .sum::<f64>()
            / 10.0;

        assert_relative_eq!(forest.predict(probe.view()).unwrap(), mean);
        assert_eq!(forest.trees().len(), 10);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let (x, y) = linear_data(40);
        let a = RandomForest::fit(small_config(), &x, &y).unwrap();
        let b = RandomForest::fit(small_config(), &x, &y).unwrap();
        assert_eq!(a, b);

        let c = RandomForest::fit(
            ForestConfig {
                random_seed: 7,
                ..small_config()
            },
            &x,
            &y,
        )
        .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_without_bootstrap_trees_fit_exactly() {
        let (x, y) = linear_data(20);
        let config = ForestConfig {
            bootstrap: false,
            ..small_config()
        };
        let forest = RandomForest::fit(config, &x, &y).unwrap();

        for i in 0..20 {
            assert_relative_eq!(forest.predict(x.row(i)).unwrap(), y[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_predictions_within_target_range() {
        let (x, y) = linear_data(50);
        let forest = RandomForest::fit(small_config(), &x, &y).unwrap();
        let preds = forest.predict_batch(&x).unwrap();

        assert!(preds.iter().all(|p| p.is_finite() && *p >= 10.0 && *p <= 157.0));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let (x, y) = linear_data(10);
        let forest = RandomForest::fit(small_config(), &x, &y).unwrap();
        let err = forest.predict(array![1.0].view()).unwrap_err();
        assert!(matches!(
            err,
            RegressorError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }
}
