//! Fixed-point search for the number of shares to sell.
//!
//! Selling `n` shares costs a commission that depends on `n`, and the
//! commission has a minimum-fee floor, so the share count cannot be solved in
//! closed form. Starting from the count that covers the baseline liability
//! alone, the solver repeatedly prices the commission for the current count,
//! rebuilds the liability and re-derives the count (always rounding up to a
//! whole share) until two passes agree.
//!
//! The search is capped at [`MAX_ITERATIONS`]. Hitting the cap is reported as
//! [`FixedPoint::Exhausted`] rather than returning the stale estimate as an
//! answer.

use rust_decimal::Decimal;
use tracing::{trace, warn};

use crate::calculations::common::in_range;
use crate::{BrokerFees, StcError};

/// Maximum number of passes before the search gives up.
pub const MAX_ITERATIONS: usize = 100;

/// Share count and the fee figures that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Solution {
    /// Whole shares to sell.
    pub shares: Decimal,
    /// Commission for `shares` before the floor.
    pub commission: Decimal,
    /// Commission after the floor.
    pub applied_fee: Decimal,
    /// Liability to cover when selling `shares`.
    pub liability: Decimal,
}

/// Outcome of the share-count search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPoint {
    /// Selling `shares` exactly covers the liability those shares generate.
    Converged(Solution),
    /// The cap was reached; holds the figures from the last pass.
    Exhausted(Solution),
}

impl FixedPoint {
    /// Converts the outcome into the converged solution.
    ///
    /// # Errors
    ///
    /// Returns [`StcError::DidNotConverge`] for an exhausted search.
    pub fn into_result(self) -> Result<Solution, StcError> {
        match self {
            FixedPoint::Converged(solution) => Ok(solution),
            FixedPoint::Exhausted(last) => Err(StcError::DidNotConverge {
                iterations: MAX_ITERATIONS,
                last_shares: last.shares,
                last_liability: last.liability,
            }),
        }
    }
}

/// Searches for the whole share count that covers its own liability.
///
/// * `baseline` seeds the search: the first estimate is `ceil(baseline / price)`.
/// * `price` is the per-share sale price.
/// * `liability` maps the floored commission of a pass to that pass's total
///   liability.
///
/// A non-positive `price` has no solution and is reported as exhausted with a
/// zero estimate.
///
/// # Errors
///
/// Returns [`StcError::Overflow`] if a share count or commission leaves the
/// `Decimal` range, or any error raised by `liability`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use stc_core::BrokerFees;
/// use stc_core::calculations::solver::{FixedPoint, solve};
///
/// let fees = BrokerFees::default();
/// let baseline = dec!(2186.00);
/// let outcome = solve(baseline, dec!(50.00), &fees, |fee| Ok(baseline + fee)).unwrap();
///
/// let FixedPoint::Converged(solution) = outcome else { panic!("no fixed point") };
/// assert_eq!(solution.shares, dec!(45));
/// assert_eq!(solution.liability, dec!(2211.00));
/// ```
pub fn solve<F>(
    baseline: Decimal,
    price: Decimal,
    fees: &BrokerFees,
    liability: F,
) -> Result<FixedPoint, StcError>
where
    F: Fn(Decimal) -> Result<Decimal, StcError>,
{
    if price <= Decimal::ZERO {
        warn!(price = %price, "Sale price is not positive; no share count can cover the liability");
        return Ok(FixedPoint::Exhausted(Solution::default()));
    }

    let shares_for = |amount: Decimal| {
        in_range(amount.checked_div(price), "shares to sell").map(|shares| shares.ceil())
    };

    let mut shares = shares_for(baseline)?;
    let mut last = Solution::default();

    for iteration in 0..MAX_ITERATIONS {
        let (commission, applied_fee) = fees.commission_for(shares)?;
        let total = liability(applied_fee)?;
        let next = shares_for(total)?;

        trace!(
            iteration,
            shares = %shares,
            applied_fee = %applied_fee,
            liability = %total,
            next = %next,
            "share count pass"
        );

        last = Solution {
            shares,
            commission,
            applied_fee,
            liability: total,
        };

        if next == shares {
            return Ok(FixedPoint::Converged(last));
        }
        shares = next;
    }

    warn!(
        shares = %last.shares,
        liability = %last.liability,
        "Share count did not settle within {MAX_ITERATIONS} iterations"
    );
    Ok(FixedPoint::Exhausted(last))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn fees(
        commission_rate: Decimal,
        minimum_fee: Decimal,
    ) -> BrokerFees {
        BrokerFees {
            commission_rate,
            minimum_fee,
            flat_fee: Decimal::ZERO,
        }
    }

    #[test]
    fn converges_when_floor_pushes_past_seed() {
        let fees = fees(dec!(0.03), dec!(25.00));
        let baseline = dec!(2186.00);

        let outcome = solve(baseline, dec!(50.00), &fees, |fee| Ok(baseline + fee)).unwrap();

        assert_eq!(
            outcome,
            FixedPoint::Converged(Solution {
                shares: dec!(45),
                commission: dec!(1.35),
                applied_fee: dec!(25.00),
                liability: dec!(2211.00),
            })
        );
    }

    #[test]
    fn converges_on_seed_without_fees() {
        let fees = fees(Decimal::ZERO, Decimal::ZERO);
        let baseline = dec!(1000.00);

        let outcome = solve(baseline, dec!(50.00), &fees, |fee| Ok(baseline + fee)).unwrap();

        let solution = outcome.into_result().unwrap();
        assert_eq!(solution.shares, dec!(20));
        assert_eq!(solution.liability, dec!(1000.00));
    }

    #[test]
    fn commission_above_floor_is_solved_iteratively() {
        // Commission of 1.00 per share on a 10.00 share: each extra share
        // sold adds another 1.00 of liability.
        let fees = fees(dec!(1.00), Decimal::ZERO);
        let baseline = dec!(100.00);

        let solution = solve(baseline, dec!(10.00), &fees, |fee| Ok(baseline + fee))
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(solution.shares, dec!(12));
        assert_eq!(solution.commission, dec!(12.00));
        assert_eq!(solution.liability, dec!(112.00));
    }

    #[test]
    fn solution_satisfies_fixed_point_recheck() {
        let fees = fees(dec!(0.25), dec!(5.00));
        let baseline = dec!(12345.67);
        let price = dec!(3.21);

        let solution = solve(baseline, price, &fees, |fee| Ok(baseline + fee))
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!((solution.liability / price).ceil(), solution.shares);
    }

    #[test]
    fn commission_at_share_price_never_settles() {
        // Every share sold costs as much commission as it raises.
        let fees = fees(dec!(50.00), Decimal::ZERO);
        let baseline = dec!(1000.00);

        let outcome = solve(baseline, dec!(50.00), &fees, |fee| Ok(baseline + fee)).unwrap();

        assert!(matches!(outcome, FixedPoint::Exhausted(_)));
        assert!(matches!(
            outcome.into_result(),
            Err(StcError::DidNotConverge {
                iterations: MAX_ITERATIONS,
                ..
            })
        ));
    }

    #[test]
    fn non_positive_price_has_no_solution() {
        let fees = fees(dec!(0.03), dec!(25.00));

        let outcome = solve(dec!(100.00), Decimal::ZERO, &fees, Ok).unwrap();

        assert_eq!(outcome, FixedPoint::Exhausted(Solution::default()));
    }

    #[test]
    fn negative_baseline_still_charges_minimum_fee() {
        let fees = fees(dec!(0.03), dec!(25.00));
        let baseline = dec!(-296.50);

        let solution = solve(baseline, dec!(5.00), &fees, |fee| Ok(baseline + fee))
            .unwrap()
            .into_result()
            .unwrap();

        // -271.50 / 5 = -54.3 -> -54
        assert_eq!(solution.applied_fee, dec!(25.00));
        assert_eq!(solution.liability, dec!(-271.50));
        assert_eq!(solution.shares, dec!(-54));
    }

    #[test]
    fn tiny_price_overflows_share_count() {
        let fees = fees(dec!(0.03), dec!(25.00));
        let baseline = dec!(1000000.00);

        let result = solve(baseline, dec!(0.0000000000000000000000001), &fees, |fee| {
            Ok(baseline + fee)
        });

        assert_eq!(
            result,
            Err(StcError::Overflow {
                step: "shares to sell"
            })
        );
    }

    #[test]
    fn liability_errors_are_propagated() {
        let fees = fees(dec!(0.03), dec!(25.00));

        let result = solve(dec!(100.00), dec!(10.00), &fees, |_| {
            Err(StcError::Overflow { step: "total costs" })
        });

        assert_eq!(result, Err(StcError::Overflow { step: "total costs" }));
    }
}
