//! Sell-to-cover calculation engine.
//!
//! Given an option exercise or an RSU release, works out how many whole
//! shares have to be sold so the proceeds cover the taxes and broker fees
//! the event itself generates.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use stc_core::{Calculator, OptionInput};
//!
//! let calculator = Calculator::default();
//! let result = calculator
//!     .calculate(&OptionInput {
//!         exercise_price: dec!(10.00),
//!         exercised_shares: dec!(100),
//!         fmv: dec!(50.00),
//!     })
//!     .unwrap();
//!
//! assert_eq!(result.shares_to_sell, dec!(45));
//! assert_eq!(result.net_shares, dec!(55));
//! assert_eq!(result.residual, dec!(39.00));
//! ```

pub mod batch;
pub mod calculations;
pub mod calculator;
pub mod error;
pub mod models;

pub use batch::{BatchResult, Summary, run_batch};
pub use calculations::{calculate, calculate_rsu, round_money};
pub use calculator::Calculator;
pub use error::StcError;
pub use models::*;
