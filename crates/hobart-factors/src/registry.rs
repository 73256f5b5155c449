//! Factor Registry
//!
//! Central registry for all available factors. Allows factor lookup by name
//! and by input frequency.

use crate::momentum::{ResidualMomentumFactor, ReversalMomentumFactor};
use crate::traits::{DataFrequency, Factor};
use derive_more::Display;

/// Available factor categories
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorCategory {
    /// Total-return momentum (reversal-adjusted yearly momentum)
    #[display("momentum")]
    Momentum,
    /// Momentum of the part of returns the market does not explain
    #[display("residual")]
    Residual,
}

/// Factor metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorInfo {
    /// Factor name (unique identifier)
    pub name: String,
    /// Factor category
    pub category: FactorCategory,
    /// Input frequency
    pub frequency: DataFrequency,
    /// Brief description of what the factor measures
    pub description: String,
    /// Required input series
    pub required_inputs: Vec<String>,
    /// Observations needed per instrument under the default configuration
    pub lookback: usize,
}

impl FactorInfo {
    fn of(factor: &dyn Factor, category: FactorCategory) -> Self {
        Self {
            name: factor.name().to_string(),
            category,
            frequency: factor.frequency(),
            description: factor.description().to_string(),
            required_inputs: factor
                .required_inputs()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            lookback: factor.lookback(),
        }
    }
}

/// Get all available factor info
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo::of(&ReversalMomentumFactor::default(), FactorCategory::Momentum),
        FactorInfo::of(&ResidualMomentumFactor::default(), FactorCategory::Residual),
    ]
}

/// Get factors by input frequency
pub fn factors_by_frequency(frequency: DataFrequency) -> Vec<FactorInfo> {
    available_factors()
        .into_iter()
        .filter(|f| f.frequency == frequency)
        .collect()
}

/// Get factor info by name
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    available_factors().into_iter().find(|f| f.name == name)
}
