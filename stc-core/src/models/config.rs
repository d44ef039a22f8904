//! Tax rate and broker fee configuration.
//!
//! A [`StcConfig`] is a plain value. It is bound to a
//! [`Calculator`](crate::Calculator) and may be swapped between calls, but is
//! never mutated during one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::StcError;
use crate::calculations::common::in_range;

/// Rates applied to the taxable gain of an event, one per tax line.
///
/// The rates are independent; their sum is not constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRates {
    pub federal: Decimal,
    pub medicare: Decimal,
    pub social_security: Decimal,
    pub state: Decimal,
    /// Local or state disability insurance rate.
    pub local: Decimal,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            federal: dec!(0.22),
            medicare: dec!(0.0145),
            social_security: dec!(0.062),
            state: Decimal::ZERO,
            local: Decimal::ZERO,
        }
    }
}

/// Brokerage charges on the sell side of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerFees {
    /// Commission charged per share sold (commission = rate × shares).
    pub commission_rate: Decimal,

    /// Floor applied to the commission.
    pub minimum_fee: Decimal,

    /// Flat payment-processing fee charged once per transaction.
    pub flat_fee: Decimal,
}

impl Default for BrokerFees {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.03),
            minimum_fee: dec!(25.00),
            flat_fee: Decimal::ZERO,
        }
    }
}

impl BrokerFees {
    /// Commission for `shares` sold before and after the minimum-fee floor,
    /// as `(commission, applied_fee)`.
    ///
    /// # Errors
    ///
    /// Returns [`StcError::Overflow`] if the commission does not fit in a
    /// `Decimal`.
    pub fn commission_for(
        &self,
        shares: Decimal,
    ) -> Result<(Decimal, Decimal), StcError> {
        let commission = in_range(shares.checked_mul(self.commission_rate), "broker commission")?;
        Ok((commission, commission.max(self.minimum_fee)))
    }
}

/// Full configuration for a sell-to-cover calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StcConfig {
    pub tax_rates: TaxRates,
    pub broker_fees: BrokerFees,
}

impl StcConfig {
    /// Checks that no rate or fee is negative.
    ///
    /// # Errors
    ///
    /// Returns [`StcError::InvalidConfig`] naming the first offending field.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use stc_core::{StcConfig, StcError};
    ///
    /// let mut config = StcConfig::default();
    /// config.broker_fees.minimum_fee = dec!(-1);
    ///
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(StcError::InvalidConfig { field: "minimum_fee", value: dec!(-1) })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), StcError> {
        let rates = &self.tax_rates;
        let fees = &self.broker_fees;
        let fields = [
            ("federal", rates.federal),
            ("medicare", rates.medicare),
            ("social_security", rates.social_security),
            ("state", rates.state),
            ("local", rates.local),
            ("commission_rate", fees.commission_rate),
            ("minimum_fee", fees.minimum_fee),
            ("flat_fee", fees.flat_fee),
        ];

        match fields.into_iter().find(|(_, value)| *value < Decimal::ZERO) {
            Some((field, value)) => Err(StcError::InvalidConfig { field, value }),
            None => Ok(()),
        }
    }
}
