//! Calculation snapshots returned by the solvers.
//!
//! Every intermediate quantity is kept so callers can show the full
//! breakdown. Negative `residual` or `net_shares` values are legitimate
//! outcomes (the position cannot cover its own liability) and are left for
//! the caller to flag.
//!
//! Decimal fields serialize as exact JSON numbers rather than strings.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::serde::arbitrary_precision as exact;
use serde::Serialize;

use crate::StcError;
use crate::calculations::format_fixed;

/// The five per-line tax amounts for a taxable gain and their total.
///
/// Each line is rounded to the cent on its own; `total` is the exact sum of
/// the rounded lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxLines {
    pub federal: Decimal,
    pub medicare: Decimal,
    pub social_security: Decimal,
    pub state: Decimal,
    pub local: Decimal,
    pub total: Decimal,
}

/// Result of an option exercise calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionResult {
    #[serde(serialize_with = "exact::serialize")]
    pub exercise_price: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub exercised_shares: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub fmv: Decimal,

    /// Cash needed to pay the strike price (cost basis).
    #[serde(serialize_with = "exact::serialize")]
    pub option_cost: Decimal,
    /// Spread between FMV and strike across all exercised shares.
    #[serde(serialize_with = "exact::serialize")]
    pub taxable_gain: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub federal_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub medicare_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub social_security_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub state_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub local_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub total_tax: Decimal,

    /// Commission before the minimum-fee floor.
    #[serde(serialize_with = "exact::serialize")]
    pub broker_commission: Decimal,
    /// Commission actually charged, after the floor.
    #[serde(serialize_with = "exact::serialize")]
    pub broker_fees: Decimal,

    /// Total liability covered by the sale.
    #[serde(serialize_with = "exact::serialize")]
    pub total_costs: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub shares_to_sell: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub est_gross_proceeds: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub residual: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub net_shares: Decimal,
}

impl OptionResult {
    /// Pretty-printed JSON with every field as a labeled number.
    ///
    /// # Errors
    ///
    /// Returns [`StcError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, StcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for OptionResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "STC Result: {} shares to sell, ${} residual, {} net shares remaining",
            self.shares_to_sell.normalize(),
            format_fixed(self.residual, 2),
            self.net_shares.normalize(),
        )
    }
}

/// Result of an RSU release calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsuResult {
    #[serde(serialize_with = "exact::serialize")]
    pub shares_released: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub vest_price: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub sale_price: Decimal,

    /// Full released value at vest.
    #[serde(serialize_with = "exact::serialize")]
    pub taxable_gain: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub federal_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub medicare_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub social_security_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub state_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub local_tax: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub total_tax: Decimal,

    /// Commission before the minimum-fee floor.
    #[serde(serialize_with = "exact::serialize")]
    pub broker_commission: Decimal,
    /// Commission actually charged, after the floor.
    #[serde(serialize_with = "exact::serialize")]
    pub broker_fees: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub flat_fee: Decimal,
    /// Applied commission plus the flat fee.
    #[serde(serialize_with = "exact::serialize")]
    pub total_fees: Decimal,

    #[serde(serialize_with = "exact::serialize")]
    pub total_costs: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub shares_to_sell: Decimal,
    /// Value of the shares kept after the sale, at the sale price.
    #[serde(serialize_with = "exact::serialize")]
    pub est_gross_proceeds: Decimal,
    /// Sale proceeds of the sold shares minus total costs.
    #[serde(serialize_with = "exact::serialize")]
    pub residual: Decimal,
    #[serde(serialize_with = "exact::serialize")]
    pub net_shares: Decimal,
}

impl RsuResult {
    /// Pretty-printed JSON with every field as a labeled number.
    ///
    /// # Errors
    ///
    /// Returns [`StcError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, StcError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for RsuResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "RSU Result: {} shares to sell, ${} residual, {} net shares remaining",
            self.shares_to_sell.normalize(),
            format_fixed(self.residual, 2),
            self.net_shares.normalize(),
        )
    }
}
