#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/crema/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod encoder;
pub mod error;
pub mod one_hot;
pub mod scaler;

pub use encoder::{EncoderState, FeatureEncoder};
pub use error::{EncoderError, Result};
pub use one_hot::CategoryLevels;
pub use scaler::ScalerParams;
