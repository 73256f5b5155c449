#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod momentum;
pub mod regression;
pub mod registry;
pub mod series;
pub mod traits;
pub mod window;

// Re-export core types
pub use error::{Result, ScoreError};
pub use momentum::{
    ResidualMomentumConfig, ResidualMomentumFactor, ResidualScore, ResidualScoreMode,
    ReversalMomentumConfig, ReversalMomentumFactor, ReversalScore,
};
pub use registry::{FactorCategory, FactorInfo, available_factors, factors_by_frequency, get_factor_info};
pub use series::ReturnSeries;
pub use traits::{ConfigurableFactor, DataFrequency, Factor, FactorConfig};
pub use window::RollingWindow;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
