//! Error types for score computations.

use thiserror::Error;

/// Result type for score computations.
pub type Result<T> = std::result::Result<T, ScoreError>;

/// Errors that can occur while computing a factor score for one instrument.
///
/// None of these abort a cross-section: the caller excludes the offending
/// instrument from the cycle and keeps ranking the others.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// Window not yet full
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// A price used as a return denominator is zero
    #[error("Zero price at window position {position} (0 = newest)")]
    ZeroPrice {
        /// Newest-first position of the offending price
        position: usize,
    },

    /// An input or result is NaN or infinite
    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    /// The regression design matrix has no unique least-squares solution
    #[error("Singular design matrix: {0}")]
    SingularMatrix(String),

    /// Dimension mismatch between inputs
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid configuration parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ScoreError {
    /// Whether this error is the normal warm-up state rather than a fault.
    pub const fn is_warmup(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
