use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the sell-to-cover engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StcError {
    /// A required input field was zero or negative.
    #[error("{field} must be greater than 0, got {value}")]
    InvalidInput { field: &'static str, value: Decimal },

    /// A tax rate or broker fee was negative.
    #[error("{field} must not be negative, got {value}")]
    InvalidConfig { field: &'static str, value: Decimal },

    /// The share-count iteration hit its cap without settling.
    #[error(
        "shares to sell did not converge after {iterations} iterations \
         (last estimate {last_shares} shares for {last_liability} liability)"
    )]
    DidNotConverge {
        iterations: usize,
        last_shares: Decimal,
        last_liability: Decimal,
    },

    /// An intermediate amount does not fit in a `Decimal`. Raised for inputs
    /// that are positive but far outside any realistic grant.
    #[error("{step} is out of range for the given inputs")]
    Overflow { step: &'static str },

    /// One element of a batch failed; `index` is its 0-based position.
    #[error("batch item {index} failed: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<StcError>,
    },

    #[error("failed to serialize result: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StcError {
    fn from(err: serde_json::Error) -> Self {
        StcError::Serialization(err.to_string())
    }
}
