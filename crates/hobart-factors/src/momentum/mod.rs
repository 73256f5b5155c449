//! Momentum factors
//!
//! Two cross-sectional momentum signals:
//! - Reversal-adjusted momentum: returns measured up to one month ago, so the
//!   short-term reversal of the latest month does not contaminate the score.
//! - Residual momentum: compounded residual of a single-index market model,
//!   i.e. the part of recent returns that market beta does not explain.

pub mod residual;
pub mod reversal;

pub use residual::{
    ResidualMomentumConfig, ResidualMomentumFactor, ResidualScore, ResidualScoreMode,
};
pub use reversal::{ReversalMomentumConfig, ReversalMomentumFactor, ReversalScore};
