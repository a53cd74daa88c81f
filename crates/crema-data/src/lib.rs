#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/crema/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coffee;
pub mod dataset;
pub mod error;
pub mod record;
pub mod schema;

pub use coffee::CoffeeAttributes;
pub use dataset::{load_inference_csv, load_training_csv, read_frame, records_from_frame};
pub use error::{DataError, Result};
pub use record::{AttributeValue, Record};
pub use schema::{AttributeKind, AttributeSpec, Schema};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
