#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod allocation;
pub mod config;
pub mod error;
pub mod rebalance;
pub mod replay;
pub mod selection;
pub mod strategy;

// Re-export main types from sub-crates
pub use hobart_data as data;
pub use hobart_factors as factors;
pub use hobart_output as output;

pub use allocation::{RebalancePlan, TargetWeight, plan_rebalance};
pub use config::{
    ConfigError, HobartConfig, LoggingConfig, ResidualStrategyConfig, ReversalStrategyConfig,
    default_config_path,
};
pub use error::StrategyError;
pub use rebalance::{RebalanceState, StrategyContext};
pub use replay::{CycleRecord, Replay, ReplayOutcome};
pub use selection::{Selection, SelectionOutcome};
pub use strategy::{
    ResidualMomentumStrategy, ReversalMomentumStrategy, Strategy, StrategyKind, SymbolScore,
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
}
