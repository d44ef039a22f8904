mod config;
mod input;
mod result;

pub use config::{BrokerFees, StcConfig, TaxRates};
pub use input::{OptionInput, RsuInput};
pub use result::{OptionResult, RsuResult, TaxLines};
