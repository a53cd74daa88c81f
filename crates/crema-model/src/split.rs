//! Train/test split
//!
//! Seeded shuffle-split over row positions. The held-out part takes
//! `ceil(n * test_fraction)` rows from the front of the permutation and the
//! training part takes the rest, so the two are disjoint and together cover
//! every row. The same seed and row count always give the same partition.

use crate::error::{RegressorError, Result};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Row positions of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Rows used for fitting
    pub train: Vec<usize>,
    /// Rows held out for evaluation
    pub test: Vec<usize>,
}

impl SplitIndices {
    /// Select `items` at the given row positions.
    pub fn take<T: Clone>(items: &[T], positions: &[usize]) -> Vec<T> {
        positions.iter().map(|&i| items[i].clone()).collect()
    }
}

/// Partition `n` rows into train and test positions.
///
/// # Errors
/// `InvalidParameter` unless `0 < test_fraction < 1`.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(RegressorError::InvalidParameter(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n);

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);

    Ok(SplitIndices {
        train,
        test: permutation,
    })
}
