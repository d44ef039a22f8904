//! Common utility functions for sell-to-cover calculations.
//!
//! Dollar line items are rounded to the cent individually, the way a
//! brokerage statement itemizes them, rather than rounding only the final
//! total.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{StcError, TaxLines, TaxRates};

/// Rounds a monetary amount to the nearest cent, ties away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use stc_core::calculations::common::round_money;
///
/// assert_eq!(round_money(dec!(2.004)), dec!(2.00));
/// assert_eq!(round_money(dec!(2.005)), dec!(2.01));
/// assert_eq!(round_money(dec!(-2.005)), dec!(-2.01)); // Away from zero
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders `value` with exactly `places` decimal places, rounding ties away
/// from zero and padding with trailing zeros.
///
/// ```
/// use rust_decimal_macros::dec;
/// use stc_core::calculations::common::format_fixed;
///
/// assert_eq!(format_fixed(dec!(45), 4), "45.0000");
/// assert_eq!(format_fixed(dec!(37.125), 2), "37.13");
/// ```
pub fn format_fixed(
    value: Decimal,
    places: u32,
) -> String {
    let mut fixed = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    fixed.rescale(places);
    fixed.to_string()
}

/// Turns the result of a `checked_*` operation into a value or an
/// [`StcError::Overflow`] naming `step`.
pub(crate) fn in_range(
    value: Option<Decimal>,
    step: &'static str,
) -> Result<Decimal, StcError> {
    value.ok_or(StcError::Overflow { step })
}

/// Computes the five tax lines for `taxable_gain`.
///
/// A negative gain yields negative lines; nothing is clamped.
///
/// # Errors
///
/// Returns [`StcError::Overflow`] when a line or the total does not fit in a
/// `Decimal`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use stc_core::TaxRates;
/// use stc_core::calculations::common::tax_lines;
///
/// let lines = tax_lines(dec!(4000.00), &TaxRates::default()).unwrap();
///
/// assert_eq!(lines.federal, dec!(880.00));
/// assert_eq!(lines.medicare, dec!(58.00));
/// assert_eq!(lines.social_security, dec!(248.00));
/// assert_eq!(lines.total, dec!(1186.00));
/// ```
pub fn tax_lines(
    taxable_gain: Decimal,
    rates: &TaxRates,
) -> Result<TaxLines, StcError> {
    let line = |rate: Decimal, step| {
        in_range(taxable_gain.checked_mul(rate), step).map(round_money)
    };

    let federal = line(rates.federal, "federal tax")?;
    let medicare = line(rates.medicare, "medicare tax")?;
    let social_security = line(rates.social_security, "social security tax")?;
    let state = line(rates.state, "state tax")?;
    let local = line(rates.local, "local tax")?;

    let total = [medicare, social_security, state, local]
        .into_iter()
        .try_fold(federal, |sum, tax| in_range(sum.checked_add(tax), "total tax"))?;

    Ok(TaxLines {
        federal,
        medicare,
        social_security,
        state,
        local,
        total,
    })
}
