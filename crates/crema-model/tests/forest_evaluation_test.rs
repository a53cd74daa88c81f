//! Integration tests: fit a forest on a held-out split and score it.

use crema_model::{
    ForestConfig, RandomForest, RegressionMetrics, Regressor, SplitIndices, train_test_split,
};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// y = 2 * x0 - x1 + noise, x2 uninformative
fn noisy_linear(n: usize, seed: u64) -> (Vec<[f64; 3]>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n);
    let mut targets = Vec::with_capacity(n);

    for _ in 0..n {
        let row = [
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.0..50.0),
            rng.gen_range(0.0..1.0),
        ];
        targets.push(2.0 * row[0] - row[1] + rng.gen_range(-2.0..2.0));
        rows.push(row);
    }

    (rows, targets)
}

fn to_matrix(rows: &[[f64; 3]]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), 3), |(i, j)| rows[i][j])
}

#[test]
fn test_held_out_fit_quality() {
    let (rows, targets) = noisy_linear(300, 1);
    let split = train_test_split(rows.len(), 0.2, 42).unwrap();

    let x_train = to_matrix(&SplitIndices::take(&rows, &split.train));
    let y_train = Array1::from_vec(SplitIndices::take(&targets, &split.train));
    let x_test = to_matrix(&SplitIndices::take(&rows, &split.test));
    let y_test = SplitIndices::take(&targets, &split.test);

    let config = ForestConfig {
        num_trees: 30,
        ..Default::default()
    };
    let forest = RandomForest::fit(config, &x_train, &y_train).unwrap();
    let preds = forest.predict_batch(&x_test).unwrap();

    let metrics = RegressionMetrics::compute(&y_test, preds.as_slice().unwrap()).unwrap();

    assert_eq!(metrics.n_samples, 60);
    assert!(metrics.r2 > 0.9, "r2 = {}", metrics.r2);
    assert!(metrics.mae < 15.0, "mae = {}", metrics.mae);
    assert!(metrics.rmse >= metrics.mae);
}

#[test]
fn test_depth_limited_forest_still_finite() {
    let (rows, targets) = noisy_linear(50, 9);
    let x = to_matrix(&rows);
    let y = Array1::from_vec(targets);

    let config = ForestConfig {
        num_trees: 15,
        max_depth: Some(2),
        ..Default::default()
    };
    let forest = RandomForest::fit(config, &x, &y).unwrap();

    for tree in forest.trees() {
        assert!(tree.depth() <= 2);
    }
    forest.validate().unwrap();
    assert!(forest.predict_batch(&x).unwrap().iter().all(|p| p.is_finite()));
}
