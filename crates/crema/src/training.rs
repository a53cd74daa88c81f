//! Training and held-out evaluation.

use crate::artifact::ArtifactStore;
use crate::error::{PipelineError, Result};
use crate::pipeline::{FittedPipeline, Pipeline};
use crema_data::{Record, Schema, load_training_csv};
use crema_model::{ForestConfig, RegressionMetrics, SplitIndices, train_test_split};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default training dataset location.
pub const DEFAULT_DATA_PATH: &str = "data/NewCoffeeData.csv";

/// Default artifact location.
pub const DEFAULT_MODEL_PATH: &str = "models/coffee_price_predictor_pipeline.bin";

/// Training run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// CSV dataset with the attribute columns plus the target
    pub data_path: PathBuf,
    /// Where the fitted pipeline is saved
    pub model_path: PathBuf,
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
    /// Seed of the train/test permutation
    pub split_seed: u64,
    /// Input columns and target
    pub schema: Schema,
    /// Random forest hyperparameters
    pub forest: ForestConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            test_fraction: 0.2,
            split_seed: 42,
            schema: Schema::coffee(),
            forest: ForestConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Read a JSON config file; absent fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the split fraction and forest parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        self.forest.validate()?;
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Pipeline fitted on the training part
    pub pipeline: FittedPipeline,
    /// Scores on the held-out part
    pub metrics: RegressionMetrics,
    /// Training rows
    pub n_train: usize,
    /// Held-out rows
    pub n_test: usize,
}

/// Split, fit on the training part and score on the held-out part.
pub fn train_and_evaluate(records: &[Record], config: &TrainingConfig) -> Result<TrainingOutcome> {
    config.validate()?;

    let split = train_test_split(records.len(), config.test_fraction, config.split_seed)?;
    let train = SplitIndices::take(records, &split.train);
    let test = SplitIndices::take(records, &split.test);

    let pipeline = Pipeline::new(config.schema.clone(), config.forest.clone()).fit(&train)?;

    let target = config.schema.target();
    let y_test = test
        .iter()
        .map(|r| r.numeric(target))
        .collect::<crema_data::Result<Vec<f64>>>()?;
    let y_pred = pipeline.predict_batch(&test)?;
    let metrics = RegressionMetrics::compute(&y_test, &y_pred)?;

    info!(
        "Held-out evaluation on {} rows: MAE {:.4}, RMSE {:.4}, R2 {:.4}",
        test.len(),
        metrics.mae,
        metrics.rmse,
        metrics.r2
    );

    Ok(TrainingOutcome {
        pipeline,
        metrics,
        n_train: train.len(),
        n_test: test.len(),
    })
}

/// Load the dataset, train, evaluate and save the artifact.
///
/// Nothing is written unless loading and fitting both succeed. The artifact
/// is saved regardless of the scores.
pub fn train_from_config<S: ArtifactStore>(
    config: &TrainingConfig,
    store: &S,
) -> Result<TrainingOutcome> {
    config.validate()?;
    let records = load_training_csv(&config.data_path, &config.schema)?;
    let outcome = train_and_evaluate(&records, config)?;
    store.save(&outcome.pipeline, &config.model_path)?;
    Ok(outcome)
}
