//! Feature Encoder
//!
//! Maps records to fixed-width numeric vectors. The layout is fixed when the
//! encoder is fitted:
//!
//! [ z(numeric_1) .. z(numeric_k) | onehot(categorical_1) .. onehot(categorical_m) ]
//!
//! Numeric and categorical columns each keep schema order; one-hot blocks
//! keep sorted level order. Single records and batches go through the same
//! row encoder, so both paths produce identical rows.

use crate::error::{EncoderError, Result};
use crate::one_hot::CategoryLevels;
use crate::scaler::ScalerParams;
use crema_data::{Record, Schema};
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Unfitted encoder: knows which columns to encode
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    schema: Schema,
}

impl FeatureEncoder {
    /// Create an encoder for the given schema.
    pub const fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Schema this encoder reads.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Learn scaling parameters and category levels from training records.
    ///
    /// # Errors
    /// * `InsufficientData` for an empty collection
    /// * `Schema` when a record lacks an attribute or holds the wrong kind
    /// * `NonFinite` when a numeric attribute is NaN or infinite
    pub fn fit(&self, records: &[Record]) -> Result<EncoderState> {
        if records.is_empty() {
            return Err(EncoderError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let mut numeric = Vec::new();
        for column in self.schema.numeric() {
            let values = records
                .iter()
                .map(|r| {
                    let v = r.numeric(column)?;
                    if v.is_finite() {
                        Ok(v)
                    } else {
                        Err(EncoderError::NonFinite(column.to_string()))
                    }
                })
                .collect::<Result<Vec<f64>>>()?;

            let params = ScalerParams::fit(column, &values);
            debug!(
                "{}: mean={:.4}, scale={:.4}",
                column, params.mean, params.scale
            );
            numeric.push(params);
        }

        let mut categorical = Vec::new();
        for column in self.schema.categorical() {
            let labels = records
                .iter()
                .map(|r| r.category(column))
                .collect::<crema_data::Result<Vec<&str>>>()?;

            let levels = CategoryLevels::fit(column, labels);
            debug!("{}: {} levels {:?}", column, levels.width(), levels.levels);
            categorical.push(levels);
        }

        let state = EncoderState::from_parts(numeric, categorical);
        info!(
            "Fitted encoder on {} records: {} features",
            records.len(),
            state.n_features()
        );

        Ok(state)
    }
}

/// Fitted encoder state
///
/// Only the column parameters are persisted; output names are rebuilt from
/// them on load so the layout can never disagree with the blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EncoderParts", into = "EncoderParts")]
pub struct EncoderState {
    numeric: Vec<ScalerParams>,
    categorical: Vec<CategoryLevels>,
    feature_names: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct EncoderParts {
    numeric: Vec<ScalerParams>,
    categorical: Vec<CategoryLevels>,
}

impl From<EncoderParts> for EncoderState {
    fn from(parts: EncoderParts) -> Self {
        Self::from_parts(parts.numeric, parts.categorical)
    }
}

impl From<EncoderState> for EncoderParts {
    fn from(state: EncoderState) -> Self {
        Self {
            numeric: state.numeric,
            categorical: state.categorical,
        }
    }
}

impl EncoderState {
    /// Assemble a state from fitted column parameters.
    pub fn from_parts(numeric: Vec<ScalerParams>, categorical: Vec<CategoryLevels>) -> Self {
        let feature_names = numeric
            .iter()
            .map(|p| p.column.clone())
            .chain(categorical.iter().flat_map(|c| c.feature_names()))
            .collect();

        Self {
            numeric,
            categorical,
            feature_names,
        }
    }

    /// Output width.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Output column names in vector order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Scaling parameters of the numeric columns.
    pub fn numeric(&self) -> &[ScalerParams] {
        &self.numeric
    }

    /// Levels of the categorical columns.
    pub fn categorical(&self) -> &[CategoryLevels] {
        &self.categorical
    }

    /// Encode one record.
    pub fn transform_one(&self, record: &Record) -> Result<Array1<f64>> {
        Ok(Array1::from_vec(self.encode_row(record)?))
    }

    /// Encode a batch of records into an (N x n_features) matrix.
    pub fn transform(&self, records: &[Record]) -> Result<Array2<f64>> {
        let mut out = Array2::<f64>::zeros((records.len(), self.n_features()));

        for (i, record) in records.iter().enumerate() {
            let row = self.encode_row(record)?;
            out.row_mut(i).assign(&ArrayView1::from(&row));
        }

        Ok(out)
    }

    fn encode_row(&self, record: &Record) -> Result<Vec<f64>> {
        let mut row = vec![0.0; self.n_features()];

        for (slot, params) in row.iter_mut().zip(&self.numeric) {
            *slot = params.transform(record.numeric(&params.column)?);
        }

        let mut offset = self.numeric.len();
        for levels in &self.categorical {
            let label = record.category(&levels.column)?;
            let block = &mut row[offset..offset + levels.width()];
            if !levels.encode_into(label, block) {
                debug!("Unknown {} label {:?}, encoded as zeros", levels.column, label);
            }
            offset += levels.width();
        }

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crema_data::{AttributeSpec, DataError};
    use rstest::rstest;

    fn schema() -> Schema {
        Schema::new(
            vec![
                AttributeSpec::categorical("Roast_Level"),
                AttributeSpec::numeric("Bean_Cost_INR"),
                AttributeSpec::numeric("Month"),
            ],
            "price",
        )
    }

    fn record(roast: &str, cost: f64, month: f64) -> Record {
        Record::new()
            .with_category("Roast_Level", roast)
            .with_numeric("Bean_Cost_INR", cost)
            .with_numeric("Month", month)
    }

    fn fitted() -> EncoderState {
        FeatureEncoder::new(schema())
            .fit(&[
                record("Medium", 100.0, 6.0),
                record("Dark", 200.0, 6.0),
                record("Light", 300.0, 6.0),
            ])
            .unwrap()
    }

    #[test]
    fn test_feature_layout() {
        let state = fitted();
        assert_eq!(
            state.feature_names(),
            &[
                "Bean_Cost_INR",
                "Month",
                "Roast_Level_Dark",
                "Roast_Level_Light",
                "Roast_Level_Medium"
            ]
        );
        assert_eq!(state.n_features(), 5);
    }

    #[test]
    fn test_transform_one() {
        let state = fitted();
        let x = state.transform_one(&record("Dark", 300.0, 7.0)).unwrap();

        let std = (20000.0_f64 / 3.0).sqrt();
        assert_relative_eq!(x[0], 100.0 / std, epsilon = 1e-12);
        // constant training column: scale 1
        assert_relative_eq!(x[1], 1.0);
        assert_eq!(x.slice(ndarray::s![2..]).to_vec(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_batch_matches_single() {
        let state = fitted();
        let records = vec![record("Light", 150.0, 2.0), record("Medium", 260.0, 9.0)];
        let batch = state.transform(&records).unwrap();

        for (i, r) in records.iter().enumerate() {
            assert_eq!(batch.row(i), state.transform_one(r).unwrap());
        }
    }

    #[test]
    fn test_unknown_category_is_zero_block() {
        let state = fitted();
        let x = state.transform_one(&record("Espresso", 200.0, 6.0)).unwrap();
        assert_eq!(x.slice(ndarray::s![2..]).to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_deserialize_rebuilds_feature_names() {
        let state = fitted();
        let mut json: serde_json::Value = serde_json::to_value(&state).unwrap();
        assert!(json.get("feature_names").is_none());

        json["feature_names"] = serde_json::json!(["a", "b"]);
        let loaded: EncoderState = serde_json::from_value(json).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.n_features(), 5);
        let x = loaded.transform_one(&record("Light", 200.0, 6.0)).unwrap();
        assert_eq!(x.len(), 5);
    }

    #[test]
    fn test_empty_fit() {
        let err = FeatureEncoder::new(schema()).fit(&[]).unwrap_err();
        assert!(matches!(
            err,
            EncoderError::InsufficientData {
                required: 1,
                actual: 0
            }
        ));
    }

    #[rstest]
    #[case::missing_numeric(Record::new().with_category("Roast_Level", "Dark").with_numeric("Month", 1.0))]
    #[case::missing_category(Record::new().with_numeric("Bean_Cost_INR", 90.0).with_numeric("Month", 1.0))]
    #[case::wrong_kind(record("Dark", 90.0, 1.0).with_category("Month", "January"))]
    fn test_schema_errors(#[case] bad: Record) {
        let fit_err = FeatureEncoder::new(schema())
            .fit(&[record("Dark", 100.0, 1.0), bad.clone()])
            .unwrap_err();
        assert!(matches!(fit_err, EncoderError::Schema(_)));

        let transform_err = fitted().transform_one(&bad).unwrap_err();
        assert!(matches!(
            transform_err,
            EncoderError::Schema(DataError::MissingAttribute(_) | DataError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_non_finite_fit() {
        let err = FeatureEncoder::new(schema())
            .fit(&[record("Dark", f64::NAN, 1.0)])
            .unwrap_err();
        assert!(matches!(err, EncoderError::NonFinite(c) if c == "Bean_Cost_INR"));
    }
}
