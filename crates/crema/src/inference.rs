//! Single-record inference entry point.

use crate::error::{PipelineError, Result};
use crate::pipeline::FittedPipeline;
use crema_data::Record;

/// Predict the price of one record.
///
/// `pipeline` is `None` when no model could be loaded; the caller gets
/// `ModelNotLoaded` instead of a panic.
///
/// # Errors
/// * `ModelNotLoaded` without a pipeline
/// * `Schema` / `Dimension` as for [`FittedPipeline::predict`]
pub fn predict_price(pipeline: Option<&FittedPipeline>, record: &Record) -> Result<f64> {
    pipeline
        .ok_or(PipelineError::ModelNotLoaded)?
        .predict(record)
}
