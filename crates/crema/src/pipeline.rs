//! Pipeline
//!
//! Composes the feature encoder and the random forest behind one fit and one
//! predict call, so callers never handle intermediate feature vectors.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use crema_data::{Record, Schema};
use crema_features::{EncoderState, FeatureEncoder};
use crema_model::forest::MIN_SAMPLES;
use crema_model::{ForestConfig, RandomForest, Regressor};
use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Unfitted pipeline: schema plus forest configuration
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    encoder: FeatureEncoder,
    forest: ForestConfig,
}

impl Pipeline {
    /// Create a pipeline for a schema and forest configuration.
    pub const fn new(schema: Schema, forest: ForestConfig) -> Self {
        Self {
            encoder: FeatureEncoder::new(schema),
            forest,
        }
    }

    /// Schema the pipeline reads.
    pub const fn schema(&self) -> &Schema {
        self.encoder.schema()
    }

    /// Fit encoder and forest on records that carry the target column.
    ///
    /// # Errors
    /// * `InsufficientData` for fewer than two records
    /// * `Schema` when the target or any attribute is missing or mistyped
    /// * `InvalidConfig` for an invalid forest configuration
    pub fn fit(&self, records: &[Record]) -> Result<FittedPipeline> {
        if records.len() < MIN_SAMPLES {
            return Err(PipelineError::InsufficientData {
                required: MIN_SAMPLES,
                actual: records.len(),
            });
        }

        let target = self.schema().target();
        let y = records
            .iter()
            .map(|r| r.numeric(target))
            .collect::<crema_data::Result<Vec<f64>>>()?;

        let encoder = self.encoder.fit(records)?;
        let x = encoder.transform(records)?;
        let forest = RandomForest::fit(self.forest.clone(), &x, &Array1::from_vec(y))?;

        info!(
            "Fitted pipeline on {} records ({} features, {} trees)",
            records.len(),
            encoder.n_features(),
            forest.trees().len()
        );

        Ok(FittedPipeline {
            schema: self.schema().clone(),
            encoder,
            forest,
            metadata: PipelineMetadata {
                crate_version: crate::VERSION.to_string(),
                trained_at: Utc::now(),
                n_train_rows: records.len(),
            },
        })
    }
}

/// Provenance recorded at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// Version of the crate that fitted the pipeline
    pub crate_version: String,
    /// Fit timestamp
    pub trained_at: DateTime<Utc>,
    /// Number of training records
    pub n_train_rows: usize,
}

/// Fitted pipeline. Immutable; safe to share across threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    schema: Schema,
    encoder: EncoderState,
    forest: RandomForest,
    metadata: PipelineMetadata,
}

impl FittedPipeline {
    /// Assemble a pipeline from separately fitted parts.
    ///
    /// The parts are not cross-checked; a width disagreement surfaces as a
    /// `Dimension` error at predict time.
    pub fn from_parts(
        schema: Schema,
        encoder: EncoderState,
        forest: RandomForest,
        metadata: PipelineMetadata,
    ) -> Self {
        Self {
            schema,
            encoder,
            forest,
            metadata,
        }
    }

    /// Predict the price of one record (target column, if present, is ignored).
    ///
    /// # Errors
    /// * `Schema` when an attribute is missing or mistyped
    /// * `Dimension` when the encoded width differs from the forest's input width
    pub fn predict(&self, record: &Record) -> Result<f64> {
        let x = self.encoder.transform_one(record)?;
        self.check_width(x.len())?;
        Ok(self.forest.predict(x.view())?)
    }

    /// Predict one price per record.
    pub fn predict_batch(&self, records: &[Record]) -> Result<Vec<f64>> {
        let x = self.encoder.transform(records)?;
        self.check_width(x.ncols())?;
        Ok(self.forest.predict_batch(&x)?.to_vec())
    }

    /// Schema the pipeline was fitted with.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Encoded feature names, in vector order.
    pub fn feature_names(&self) -> &[String] {
        self.encoder.feature_names()
    }

    /// Fitted encoder state.
    pub const fn encoder(&self) -> &EncoderState {
        &self.encoder
    }

    /// Fitted forest.
    pub const fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Fit-time provenance.
    pub const fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    fn check_width(&self, actual: usize) -> Result<()> {
        let expected = self.forest.n_features();
        if actual == expected {
            Ok(())
        } else {
            Err(PipelineError::Dimension { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crema_data::CoffeeAttributes;
    use crema_data::schema::PRICE;

    fn training_records() -> Vec<Record> {
        let origins = ["Ethiopia", "Colombia", "Brazil"];
        (0..30)
            .map(|i| {
                let attrs = CoffeeAttributes {
                    bean_origin: origins[i % 3].to_string(),
                    bean_cost: 60.0 + 8.0 * i as f64,
                    month: (i % 12 + 1) as u32,
                    ..Default::default()
                };
                attrs
                    .to_record()
                    .with_numeric(PRICE, 150.0 + 2.0 * attrs.bean_cost)
            })
            .collect()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(
            Schema::coffee(),
            ForestConfig {
                num_trees: 12,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_fit_and_predict() {
        let fitted = pipeline().fit(&training_records()).unwrap();
        let price = fitted.predict(&CoffeeAttributes::default().to_record()).unwrap();

        assert!(price.is_finite());
        assert!((270.0..=750.0).contains(&price));
        assert_eq!(fitted.metadata().n_train_rows, 30);
        // 4 numeric + 3 origins + 1 roast + 1 flavor
        assert_eq!(fitted.feature_names().len(), 9);
    }

    #[test]
    fn test_batch_matches_single() {
        let fitted = pipeline().fit(&training_records()).unwrap();
        let records = training_records();
        let batch = fitted.predict_batch(&records).unwrap();

        for (record, price) in records.iter().zip(batch) {
            assert_eq!(fitted.predict(record).unwrap(), price);
        }
    }

    #[test]
    fn test_missing_target_is_schema_error() {
        let records: Vec<Record> = training_records()
            .into_iter()
            .map(|mut r| {
                r.remove(PRICE);
                r
            })
            .collect();

        assert!(matches!(
            pipeline().fit(&records),
            Err(PipelineError::Schema(_))
        ));
    }

    #[test]
    fn test_too_few_records() {
        let records = training_records();
        assert!(matches!(
            pipeline().fit(&records[..1]),
            Err(PipelineError::InsufficientData {
                required: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            pipeline().fit(&[]),
            Err(PipelineError::InsufficientData { actual: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_forest_config() {
        let pipeline = Pipeline::new(
            Schema::coffee(),
            ForestConfig {
                num_trees: 0,
                ..Default::default()
            },
        );
        assert!(matches!(
            pipeline.fit(&training_records()),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mismatched_parts_fail_with_dimension() {
        let records = training_records();
        let wide = pipeline().fit(&records).unwrap();
        // categorical blocks dropped: encoder emits only the numeric columns
        let narrow_encoder = FittedPipeline::from_parts(
            Schema::coffee(),
            EncoderState::from_parts(wide.encoder().numeric().to_vec(), Vec::new()),
            wide.forest().clone(),
            wide.metadata().clone(),
        );

        assert!(matches!(
            narrow_encoder.predict(&records[0]),
            Err(PipelineError::Dimension {
                expected: 9,
                actual: 4
            })
        ));
    }
}
