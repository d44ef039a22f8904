use tracing::debug;

use crate::batch::{BatchResult, run_batch};
use crate::calculations::{calculate, calculate_rsu};
use crate::{
    BrokerFees, OptionInput, OptionResult, RsuInput, RsuResult, StcConfig, StcError, TaxRates,
};

/// Sell-to-cover calculator bound to a configuration.
///
/// The configuration is the only state the calculator holds. It can be
/// replaced between calls; each calculation reads it once and leaves it
/// untouched. Updating requires `&mut self`, so a calculator shared across
/// threads has to be cloned or put behind a lock first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calculator {
    config: StcConfig,
}

impl Calculator {
    /// Creates a calculator bound to `config`.
    pub fn new(config: StcConfig) -> Self {
        Self { config }
    }

    /// Returns the bound configuration.
    pub fn config(&self) -> &StcConfig {
        &self.config
    }

    /// Replaces the tax rates used by subsequent calculations.
    pub fn update_tax_rates(
        &mut self,
        rates: TaxRates,
    ) {
        debug!(?rates, "updating tax rates");
        self.config.tax_rates = rates;
    }

    /// Replaces the broker fees used by subsequent calculations.
    pub fn update_broker_fees(
        &mut self,
        fees: BrokerFees,
    ) {
        debug!(?fees, "updating broker fees");
        self.config.broker_fees = fees;
    }

    /// Calculates an option exercise. See [`calculate`].
    pub fn calculate(
        &self,
        input: &OptionInput,
    ) -> Result<OptionResult, StcError> {
        calculate(input, &self.config)
    }

    /// Calculates an RSU release. See [`calculate_rsu`].
    pub fn calculate_rsu(
        &self,
        input: &RsuInput,
    ) -> Result<RsuResult, StcError> {
        calculate_rsu(input, &self.config)
    }

    /// Calculates every input in order. See [`run_batch`].
    pub fn calculate_batch(
        &self,
        inputs: &[OptionInput],
    ) -> Result<BatchResult, StcError> {
        run_batch(inputs, self)
    }
}
