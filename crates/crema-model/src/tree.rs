//! Regression Tree
//!
//! CART-style regression tree stored as an arena. Node 0 is the root; a
//! split node refers to its children by index, and children are always
//! pushed after their parent, so every child index is greater than its
//! parent's. Traversal is a loop over indices.
//!
//! Split selection minimizes the summed squared error of the two children:
//!
//! SSE(S) = Σ (y_i - ȳ_S)²
//!
//! Thresholds are midpoints between consecutive distinct feature values;
//! rows with `x[f] <= threshold` go left.

use crate::Regressor;
use crate::error::{RegressorError, Result};
use ndarray::{ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Gains at or below this are treated as no improvement.
const MIN_GAIN: f64 = 1e-12;

/// Growth limits for a single tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth (root at depth 0); `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs to be split
    pub min_samples_split: usize,
    /// Minimum samples in each child of a split
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

/// Arena node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node predicting the mean target of its samples
    Leaf {
        /// Predicted value
        value: f64,
        /// Training samples that reached the node
        n_samples: usize,
    },
    /// Internal node
    Split {
        /// Feature column tested
        feature: usize,
        /// Rows with `x[feature] <= threshold` go left
        threshold: f64,
        /// Arena index of the left child
        left: usize,
        /// Arena index of the right child
        right: usize,
        /// Training samples that reached the node
        n_samples: usize,
    },
}

/// Fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl RegressionTree {
    /// Fit a tree on every row of `x`.
    pub fn fit<'d>(
        config: &TreeConfig,
        x: ArrayView2<'d, f64>,
        y: ArrayView1<'d, f64>,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(RegressorError::LengthMismatch {
                features: x.nrows(),
                targets: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(RegressorError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        let mut indices: Vec<usize> = (0..x.nrows()).collect();
        Ok(Self::fit_indices(config, x, y, &mut indices, rng))
    }

    /// Fit on the rows named by `indices` (duplicates allowed).
    ///
    /// Callers guarantee `indices` is non-empty and in bounds.
    pub(crate) fn fit_indices<'d>(
        config: &TreeConfig,
        x: ArrayView2<'d, f64>,
        y: ArrayView1<'d, f64>,
        indices: &mut [usize],
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut builder = TreeBuilder {
            config,
            x,
            y,
            nodes: Vec::new(),
            rng,
        };
        builder.build(indices, 0);

        Self {
            nodes: builder.nodes,
            n_features: x.ncols(),
        }
    }

    /// Arena nodes, root first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf (a lone root has depth 0).
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = *node {
                depths[left] = depths[i] + 1;
                depths[right] = depths[i] + 1;
                max_depth = max_depth.max(depths[i] + 1);
            }
        }
        max_depth
    }

    /// Check the arena invariants of a tree that did not come from `fit`.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(RegressorError::InvalidModel("empty tree".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Leaf { value, .. } => {
                    if !value.is_finite() {
                        return Err(RegressorError::InvalidModel(format!(
                            "leaf {i} has non-finite value"
                        )));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if feature >= self.n_features {
                        return Err(RegressorError::InvalidModel(format!(
                            "node {i} splits on feature {feature} of {}",
                            self.n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(RegressorError::InvalidModel(format!(
                            "node {i} has NaN threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(RegressorError::InvalidModel(format!(
                                "node {i} points at child {child}"
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf. Width is checked by the caller.
    pub(crate) fn predict_unchecked(&self, x: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value, .. } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

impl Regressor for RegressionTree {
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
        Ok(self.predict_unchecked(x))
    }
}

/// Best split found for a node
#[derive(Debug, Clone, Copy)]
struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a, 'd> {
    config: &'a TreeConfig,
    x: ArrayView2<'d, f64>,
    y: ArrayView1<'d, f64>,
    nodes: Vec<Node>,
    rng: &'a mut ChaCha8Rng,
}

impl TreeBuilder<'_, '_> {
    /// Grow the subtree for `indices`, returning its arena index.
    fn build(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| self.y[i]).sum::<f64>() / n as f64;
        let sse = indices
            .iter()
            .map(|&i| (self.y[i] - mean).powi(2))
            .sum::<f64>();

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: mean,
            n_samples: n,
        });

        let depth_reached = self.config.max_depth.is_some_and(|d| depth >= d);
        if depth_reached
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
            || sse <= MIN_GAIN
        {
            return idx;
        }

        let Some(best) = self.best_split(indices, mean, sse) else {
            return idx;
        };

        let feature = best.feature;
        indices.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));
        let mid = indices.partition_point(|&i| self.x[[i, feature]] <= best.threshold);

        let (left_rows, right_rows) = indices.split_at_mut(mid);
        let left = self.build(left_rows, depth + 1);
        let right = self.build(right_rows, depth + 1);

        self.nodes[idx] = Node::Split {
            feature,
            threshold: best.threshold,
            left,
            right,
            n_samples: n,
        };

        idx
    }

    fn best_split(&mut self, indices: &[usize], mean: f64, parent_sse: f64) -> Option<Candidate> {
        let n_features = self.x.ncols();
        let max_features = self
            .config
            .max_features
            .map_or(n_features, |m| m.min(n_features));

        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(&mut *self.rng);
        features.truncate(max_features);

        let min_leaf = self.config.min_samples_leaf;
        let n = indices.len();
        let mut best: Option<Candidate> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in features {
            column.clear();
            column.extend(indices.iter().map(|&i| (self.x[[i, feature]], self.y[i] - mean)));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            // targets are centered, so the parent sum is ~0
            let total_sum: f64 = column.iter().map(|(_, y)| y).sum();
            let total_sq: f64 = column.iter().map(|(_, y)| y * y).sum();

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for split in 1..n {
                let (prev_x, prev_y) = column[split - 1];
                left_sum += prev_y;
                left_sq += prev_y * prev_y;

                let next_x = column[split].0;
                if prev_x >= next_x || split < min_leaf || n - split < min_leaf {
                    continue;
                }

                let n_left = split as f64;
                let n_right = (n - split) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;

                let children_sse = (left_sq - left_sum * left_sum / n_left)
                    + (right_sq - right_sum * right_sum / n_right);
                let gain = parent_sse - children_sse;

                if gain > best.map_or(MIN_GAIN, |b| b.gain) {
                    let mut threshold = (prev_x + next_x) / 2.0;
                    if threshold >= next_x {
                        threshold = prev_x;
                    }
                    best = Some(Candidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}
