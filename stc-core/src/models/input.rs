use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::StcError;

/// An employee stock option exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInput {
    /// Strike price paid per share.
    pub exercise_price: Decimal,

    /// Number of options exercised.
    pub exercised_shares: Decimal,

    /// Fair market value per share on the exercise date. Shares are sold at
    /// this price.
    pub fmv: Decimal,
}

impl OptionInput {
    /// Rejects zero or negative fields.
    ///
    /// # Errors
    ///
    /// Returns [`StcError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), StcError> {
        require_positive("exercise_price", self.exercise_price)?;
        require_positive("exercised_shares", self.exercised_shares)?;
        require_positive("fmv", self.fmv)
    }
}

/// A restricted stock unit release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsuInput {
    /// Number of units released.
    pub shares_released: Decimal,

    /// Fair market value per share at vest; the tax basis.
    pub vest_price: Decimal,

    /// Expected price per share when the cover shares are sold.
    pub sale_price: Decimal,
}

impl RsuInput {
    /// Rejects zero or negative fields.
    ///
    /// # Errors
    ///
    /// Returns [`StcError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), StcError> {
        require_positive("shares_released", self.shares_released)?;
        require_positive("vest_price", self.vest_price)?;
        require_positive("sale_price", self.sale_price)
    }
}

fn require_positive(
    field: &'static str,
    value: Decimal,
) -> Result<(), StcError> {
    if value <= Decimal::ZERO {
        return Err(StcError::InvalidInput { field, value });
    }
    Ok(())
}
