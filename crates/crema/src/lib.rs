#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/crema/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod artifact;
pub mod error;
pub mod handle;
pub mod inference;
pub mod pipeline;
pub mod training;

// Re-export main types from sub-crates
pub use crema_data as data;
pub use crema_features as features;
pub use crema_model as model;
pub use crema_output as output;

pub use artifact::{ArtifactStore, FORMAT_VERSION, FileArtifactStore, MAGIC};
pub use error::{PipelineError, Result};
pub use handle::PipelineHandle;
pub use inference::predict_price;
pub use pipeline::{FittedPipeline, Pipeline, PipelineMetadata};
pub use training::{
    DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH, TrainingConfig, TrainingOutcome, train_and_evaluate,
    train_from_config,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_fitted_pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FittedPipeline>();
        assert_send_sync::<PipelineHandle>();
    }
}
