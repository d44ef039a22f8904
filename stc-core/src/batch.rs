//! Batch calculation of option exercises and cross-batch statistics.
//!
//! Elements of a batch are independent. With the `parallel` feature (on by
//! default) they are calculated on the rayon thread pool; results always come
//! back in input order.

use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::calculations::format_fixed;
use crate::{Calculator, OptionInput, OptionResult, StcError};

/// Ordered results of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub results: Vec<OptionResult>,
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub total_exercised_shares: Decimal,
    pub total_shares_to_sell: Decimal,
    pub total_net_shares: Decimal,
    pub total_costs: Decimal,
    pub total_taxes: Decimal,
    /// Sum of the commissions actually charged (after the floor).
    pub total_broker_fees: Decimal,
    pub average_fmv: Decimal,
}

/// Calculates every input with `calculator`, preserving order.
///
/// Fails on the first (lowest-index) failing input.
///
/// # Errors
///
/// Returns [`StcError::BatchItem`] carrying the 0-based index of the failing
/// input and its underlying error.
///
/// ```
/// use rust_decimal_macros::dec;
/// use stc_core::{Calculator, OptionInput, run_batch};
///
/// let inputs = vec![
///     OptionInput { exercise_price: dec!(10.00), exercised_shares: dec!(100), fmv: dec!(50.00) },
///     OptionInput { exercise_price: dec!(5.00), exercised_shares: dec!(200), fmv: dec!(25.00) },
/// ];
///
/// let batch = run_batch(&inputs, &Calculator::default()).unwrap();
/// let summary = batch.summarize();
///
/// assert_eq!(summary.count, 2);
/// assert_eq!(summary.total_exercised_shares, dec!(300));
/// assert_eq!(summary.average_fmv, dec!(37.5));
/// ```
pub fn run_batch(
    inputs: &[OptionInput],
    calculator: &Calculator,
) -> Result<BatchResult, StcError> {
    debug!(count = inputs.len(), "running batch");

    let calculate_item = |(index, input): (usize, &OptionInput)| {
        calculator
            .calculate(input)
            .map_err(|source| StcError::BatchItem {
                index,
                source: Box::new(source),
            })
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = inputs.par_iter().enumerate().map(calculate_item).collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = inputs.iter().enumerate().map(calculate_item).collect();

    // Sequential collect so the lowest failing index is the one reported.
    let results = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;

    Ok(BatchResult { results })
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Sums the batch and averages the FMV. An empty batch yields an
    /// all-zero summary.
    pub fn summarize(&self) -> Summary {
        if self.results.is_empty() {
            return Summary::default();
        }

        let mut summary = self.results.iter().fold(
            Summary {
                count: self.results.len(),
                ..Summary::default()
            },
            |mut acc, result| {
                acc.total_exercised_shares += result.exercised_shares;
                acc.total_shares_to_sell += result.shares_to_sell;
                acc.total_net_shares += result.net_shares;
                acc.total_costs += result.total_costs;
                acc.total_taxes += result.total_tax;
                acc.total_broker_fees += result.broker_fees;
                acc.average_fmv += result.fmv;
                acc
            },
        );

        summary.average_fmv /= Decimal::from(summary.count);
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let lines = [
            ("Total Exercised Shares:", "", self.total_exercised_shares),
            ("Total Shares To Sell:", "", self.total_shares_to_sell),
            ("Total Net Shares:", "", self.total_net_shares),
            ("Total Costs:", "$", self.total_costs),
            ("Total Taxes:", "$", self.total_taxes),
            ("Total Broker Fees:", "$", self.total_broker_fees),
            ("Average FMV:", "$", self.average_fmv),
        ];

        write!(f, "Batch Summary ({} calculations):", self.count)?;
        for (label, unit, value) in lines {
            write!(f, "\n  {label:<24}{unit}{}", format_fixed(value, 2))?;
        }
        Ok(())
    }
}
