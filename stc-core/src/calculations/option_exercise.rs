//! Sell-to-cover for an employee stock option exercise.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Option cost: shares × exercise price |
//! | 2    | Taxable gain: shares × (FMV − exercise price) |
//! | 3    | Tax lines: gain × each rate, rounded per line |
//! | 4    | Seed: ceil((option cost + total tax + flat fee) / FMV) |
//! | 5    | Shares to sell: fixed point of ceil((cost + tax + commission) / FMV) |
//! | 6    | Gross proceeds: shares to sell × FMV |
//! | 7    | Residual: gross proceeds − total costs |
//! | 8    | Net shares: exercised shares − shares to sell |
//!
//! The flat fee only moves the starting estimate. Each pass of the
//! share-count search prices option cost, total tax and the floored
//! commission, so the flat fee is not part of `total_costs`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use stc_core::{OptionInput, StcConfig, calculate};
//!
//! let input = OptionInput {
//!     exercise_price: dec!(10.00),
//!     exercised_shares: dec!(100),
//!     fmv: dec!(50.00),
//! };
//!
//! let result = calculate(&input, &StcConfig::default()).unwrap();
//!
//! assert_eq!(result.option_cost, dec!(1000.00));
//! assert_eq!(result.taxable_gain, dec!(4000.00));
//! assert_eq!(result.total_tax, dec!(1186.00));
//! assert_eq!(result.total_costs, dec!(2211.00));
//! assert_eq!(result.shares_to_sell, dec!(45));
//! assert_eq!(result.est_gross_proceeds, dec!(2250.00));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{in_range, round_money, tax_lines};
use crate::calculations::solver::solve;
use crate::{OptionInput, OptionResult, StcConfig, StcError};

/// Calculates the sell-to-cover breakdown for an option exercise.
///
/// # Errors
///
/// Returns [`StcError`] if:
/// - any input field is zero or negative
/// - any rate or fee in `config` is negative
/// - the share count does not settle within the iteration cap
/// - an intermediate amount does not fit in a `Decimal`
pub fn calculate(
    input: &OptionInput,
    config: &StcConfig,
) -> Result<OptionResult, StcError> {
    input.validate()?;
    config.validate()?;

    let option_cost = round_money(in_range(
        input.exercised_shares.checked_mul(input.exercise_price),
        "option cost",
    )?);
    let taxable_gain = round_money(in_range(
        input.exercised_shares.checked_mul(input.fmv - input.exercise_price),
        "taxable gain",
    )?);

    if taxable_gain < Decimal::ZERO {
        warn!(
            exercise_price = %input.exercise_price,
            fmv = %input.fmv,
            taxable_gain = %taxable_gain,
            "FMV is below the exercise price; tax lines will be negative"
        );
    }

    let taxes = tax_lines(taxable_gain, &config.tax_rates)?;
    let fees = &config.broker_fees;
    let cost_and_tax = in_range(option_cost.checked_add(taxes.total), "total costs")?;
    let seed = in_range(cost_and_tax.checked_add(fees.flat_fee), "total costs")?;

    let solution = solve(seed, input.fmv, fees, |applied_fee| {
        in_range(cost_and_tax.checked_add(applied_fee), "total costs")
    })?
    .into_result()?;

    let est_gross_proceeds = in_range(
        solution.shares.checked_mul(input.fmv),
        "estimated gross proceeds",
    )?;
    let residual = in_range(
        est_gross_proceeds.checked_sub(solution.liability),
        "residual",
    )?;
    let net_shares = in_range(
        input.exercised_shares.checked_sub(solution.shares),
        "net shares",
    )?;

    debug!(
        shares_to_sell = %solution.shares,
        total_costs = %solution.liability,
        residual = %residual,
        "option exercise solved"
    );

    if net_shares < Decimal::ZERO {
        warn!(
            exercised_shares = %input.exercised_shares,
            shares_to_sell = %solution.shares,
            "Liability exceeds the value of the exercised shares"
        );
    }

    Ok(OptionResult {
        exercise_price: input.exercise_price,
        exercised_shares: input.exercised_shares,
        fmv: input.fmv,
        option_cost,
        taxable_gain,
        federal_tax: taxes.federal,
        medicare_tax: taxes.medicare,
        social_security_tax: taxes.social_security,
        state_tax: taxes.state,
        local_tax: taxes.local,
        total_tax: taxes.total,
        broker_commission: solution.commission,
        broker_fees: solution.applied_fee,
        total_costs: solution.liability,
        shares_to_sell: solution.shares,
        est_gross_proceeds,
        residual,
        net_shares,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{BrokerFees, TaxRates};

    fn input(
        exercise_price: Decimal,
        exercised_shares: Decimal,
        fmv: Decimal,
    ) -> OptionInput {
        OptionInput {
            exercise_price,
            exercised_shares,
            fmv,
        }
    }

    // =========================================================================
    // Full calculation tests
    // =========================================================================

    #[test]
    fn calculate_matches_worked_example() {
        let result = calculate(
            &input(dec!(10.00), dec!(100), dec!(50.00)),
            &StcConfig::default(),
        )
        .unwrap();

        assert_eq!(
            result,
            OptionResult {
                exercise_price: dec!(10.00),
                exercised_shares: dec!(100),
                fmv: dec!(50.00),
                option_cost: dec!(1000.00),
                taxable_gain: dec!(4000.00),
                federal_tax: dec!(880.00),
                medicare_tax: dec!(58.00),
                social_security_tax: dec!(248.00),
                state_tax: dec!(0.00),
                local_tax: dec!(0.00),
                total_tax: dec!(1186.00),
                broker_commission: dec!(1.35),
                broker_fees: dec!(25.00),
                total_costs: dec!(2211.00),
                shares_to_sell: dec!(45),
                est_gross_proceeds: dec!(2250.00),
                residual: dec!(39.00),
                net_shares: dec!(55),
            }
        );
    }

    #[test]
    fn calculate_is_idempotent() {
        let input = input(dec!(12.34), dec!(750), dec!(87.65));
        let config = StcConfig::default();

        let first = calculate(&input, &config).unwrap();
        let second = calculate(&input, &config).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn calculate_uses_flat_fee_only_to_seed() {
        let mut config = StcConfig::default();
        config.broker_fees.flat_fee = dec!(10.00);

        let result = calculate(&input(dec!(10.00), dec!(100), dec!(50.00)), &config).unwrap();

        // Seed ceil(2196 / 50) = 44; then 1000 + 1186 + 25 floor = 2211 -> 45.
        assert_eq!(result.total_costs, dec!(2211.00));
        assert_eq!(result.shares_to_sell, dec!(45));
        assert_eq!(result.residual, dec!(39.00));
    }

    #[test]
    fn calculate_large_flat_fee_seed_settles_back_down() {
        let mut config = StcConfig::default();
        config.broker_fees.flat_fee = dec!(500.00);

        let result = calculate(&input(dec!(10.00), dec!(100), dec!(50.00)), &config).unwrap();

        // Seed ceil(2686 / 50) = 54; 2211 -> 45 shares, stable.
        assert_eq!(result.total_costs, dec!(2211.00));
        assert_eq!(result.shares_to_sell, dec!(45));
    }

    #[test]
    fn calculate_charges_commission_above_floor() {
        let config = StcConfig {
            tax_rates: TaxRates::default(),
            broker_fees: BrokerFees {
                commission_rate: dec!(0.50),
                minimum_fee: dec!(25.00),
                flat_fee: Decimal::ZERO,
            },
        };

        let result = calculate(&input(dec!(1.00), dec!(1000), dec!(10.00)), &config).unwrap();

        // Option cost 1000, gain 9000, tax 1980 + 130.50 + 558 = 2668.50.
        // Base 3668.50; 367 shares -> 183.50 commission -> 3852.00 -> 386
        // shares -> 193.00 -> 3861.50 -> 387 -> 193.50 -> 3862.00 -> 387.
        assert_eq!(result.total_tax, dec!(2668.50));
        assert_eq!(result.shares_to_sell, dec!(387));
        assert_eq!(result.broker_commission, dec!(193.50));
        assert_eq!(result.broker_fees, dec!(193.50));
        assert_eq!(result.total_costs, dec!(3862.00));
        assert_eq!(result.residual, dec!(8.00));
    }

    #[test]
    fn calculate_keeps_share_count_identity() {
        let result = calculate(
            &input(dec!(3.75), dec!(1234), dec!(41.19)),
            &StcConfig::default(),
        )
        .unwrap();

        assert_eq!(result.net_shares + result.shares_to_sell, dec!(1234));
        assert_eq!(result.residual, result.est_gross_proceeds - result.total_costs);
        assert_eq!((result.total_costs / result.fmv).ceil(), result.shares_to_sell);
    }

    // =========================================================================
    // Edge cases
    // =========================================================================

    #[test]
    fn calculate_underwater_exercise_produces_negative_taxes() {
        let result = calculate(
            &input(dec!(20.00), dec!(100), dec!(10.00)),
            &StcConfig::default(),
        )
        .unwrap();

        assert_eq!(result.taxable_gain, dec!(-1000.00));
        assert_eq!(result.federal_tax, dec!(-220.00));
        assert_eq!(result.total_tax, dec!(-296.50));
        // 2000 - 296.50 + 25 = 1728.50 -> 173 shares.
        assert_eq!(result.total_costs, dec!(1728.50));
        assert_eq!(result.shares_to_sell, dec!(173));
        assert_eq!(result.net_shares, dec!(-73));
    }

    #[test]
    fn calculate_rejects_zero_fmv() {
        let result = calculate(
            &input(dec!(10.00), dec!(100), Decimal::ZERO),
            &StcConfig::default(),
        );

        assert_eq!(
            result,
            Err(StcError::InvalidInput {
                field: "fmv",
                value: Decimal::ZERO
            })
        );
    }

    #[test]
    fn calculate_rejects_negative_rate() {
        let mut config = StcConfig::default();
        config.tax_rates.federal = dec!(-0.22);

        let result = calculate(&input(dec!(10.00), dec!(100), dec!(50.00)), &config);

        assert!(matches!(
            result,
            Err(StcError::InvalidConfig {
                field: "federal",
                ..
            })
        ));
    }

    #[test]
    fn calculate_reports_non_convergence() {
        let mut config = StcConfig::default();
        config.broker_fees.commission_rate = dec!(60.00);

        let result = calculate(&input(dec!(10.00), dec!(100), dec!(50.00)), &config);

        assert!(matches!(result, Err(StcError::DidNotConverge { .. })));
    }

    #[test]
    fn calculate_rejects_out_of_range_share_count() {
        let result = calculate(
            &input(dec!(1), dec!(100000000000000000000), dec!(100000000000000000000)),
            &StcConfig::default(),
        );

        assert_eq!(
            result,
            Err(StcError::Overflow {
                step: "taxable gain"
            })
        );
    }

    #[test]
    fn calculate_rejects_out_of_range_option_cost() {
        let result = calculate(
            &input(dec!(100000000000000000000), dec!(100000000000000000000), dec!(1)),
            &StcConfig::default(),
        );

        assert_eq!(result, Err(StcError::Overflow { step: "option cost" }));
    }
}
