//! Sell-to-cover for a restricted stock unit release.
//!
//! The whole released value at vest is taxable, so there is no cost basis.
//! The share-count search is seeded from the total tax alone; each pass
//! rebuilds the liability as total tax + floored commission + flat fee.
//!
//! Two reported figures are deliberately not symmetric with the option
//! exercise path:
//!
//! - `est_gross_proceeds` is the value of the shares *kept*,
//!   `(released − sold) × sale price`.
//! - `residual` is the sale proceeds of the shares *sold* minus the total
//!   costs, `sold × sale price − total costs`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use stc_core::{RsuInput, StcConfig, calculate_rsu};
//!
//! let input = RsuInput {
//!     shares_released: dec!(100),
//!     vest_price: dec!(50.00),
//!     sale_price: dec!(50.00),
//! };
//!
//! let result = calculate_rsu(&input, &StcConfig::default()).unwrap();
//!
//! assert_eq!(result.taxable_gain, dec!(5000.00));
//! assert_eq!(result.total_tax, dec!(1482.50));
//! assert_eq!(result.shares_to_sell, dec!(31));
//! assert_eq!(result.net_shares, dec!(69));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{in_range, round_money, tax_lines};
use crate::calculations::solver::solve;
use crate::{RsuInput, RsuResult, StcConfig, StcError};

/// Calculates the sell-to-cover breakdown for an RSU release.
///
/// # Errors
///
/// Returns [`StcError`] if:
/// - any input field is zero or negative
/// - any rate or fee in `config` is negative
/// - the share count does not settle within the iteration cap
/// - an intermediate amount does not fit in a `Decimal`
pub fn calculate_rsu(
    input: &RsuInput,
    config: &StcConfig,
) -> Result<RsuResult, StcError> {
    input.validate()?;
    config.validate()?;

    let taxable_gain = round_money(in_range(
        input.shares_released.checked_mul(input.vest_price),
        "taxable gain",
    )?);
    let taxes = tax_lines(taxable_gain, &config.tax_rates)?;
    let fees = &config.broker_fees;

    let solution = solve(taxes.total, input.sale_price, fees, |applied_fee| {
        taxes
            .total
            .checked_add(applied_fee)
            .and_then(|total| total.checked_add(fees.flat_fee))
            .ok_or(StcError::Overflow { step: "total costs" })
    })?
    .into_result()?;

    let net_shares = in_range(
        input.shares_released.checked_sub(solution.shares),
        "net shares",
    )?;
    let est_gross_proceeds = in_range(
        net_shares.checked_mul(input.sale_price),
        "estimated gross proceeds",
    )?;
    let residual = solution
        .shares
        .checked_mul(input.sale_price)
        .and_then(|sold| sold.checked_sub(solution.liability))
        .ok_or(StcError::Overflow { step: "residual" })?;
    let total_fees = in_range(solution.applied_fee.checked_add(fees.flat_fee), "total fees")?;

    debug!(
        shares_to_sell = %solution.shares,
        total_costs = %solution.liability,
        residual = %residual,
        "RSU release solved"
    );

    if net_shares < Decimal::ZERO {
        warn!(
            shares_released = %input.shares_released,
            shares_to_sell = %solution.shares,
            "Liability exceeds the value of the released shares"
        );
    }

    Ok(RsuResult {
        shares_released: input.shares_released,
        vest_price: input.vest_price,
        sale_price: input.sale_price,
        taxable_gain,
        federal_tax: taxes.federal,
        medicare_tax: taxes.medicare,
        social_security_tax: taxes.social_security,
        state_tax: taxes.state,
        local_tax: taxes.local,
        total_tax: taxes.total,
        broker_commission: solution.commission,
        broker_fees: solution.applied_fee,
        flat_fee: fees.flat_fee,
        total_fees,
        total_costs: solution.liability,
        shares_to_sell: solution.shares,
        est_gross_proceeds,
        residual,
        net_shares,
    })
}
