#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/alpha-factors/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod alpha101;
pub mod alpha158;
pub mod alpha360;
pub mod bar;
pub mod batch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod field;
pub mod frame;
pub mod nan;
pub mod ops;
pub mod order;
pub mod registry;
pub mod result;
pub mod series;
pub mod traits;
pub mod vector;

// Re-export core types
pub use alpha101::Alpha101Calculator;
pub use alpha158::Alpha158Calculator;
pub use alpha360::Alpha360Calculator;
pub use bar::{Bar, BaseSeries, validate_history};
pub use batch::{
    CancellationToken, build_dataset, compute_symbols, rolling_results, rolling_results_with_progress,
};
pub use config::{
    Alpha101Config, Alpha101ConfigBuilder, Alpha158Config, Alpha158ConfigBuilder, Alpha360Config,
    Alpha360ConfigBuilder, AlphaConfig, RollingOperator,
};
pub use dataset::{AlphaDataset, validate_order};
pub use error::{AlphaError, Result};
pub use field::Field;
pub use frame::{bars_from_frame, histories_from_frame};
pub use nan::NanStrategy;
pub use registry::{AlphaRegistry, FamilyInfo};
pub use result::AlphaFactorResult;
pub use series::Series;
pub use traits::{AlphaCalculator, ConfigurableCalculator, FactorFamily};
pub use vector::AlphaFeatureVector;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
