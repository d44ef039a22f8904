//! Sell-to-cover calculation modules.
//!
//! Both event types share the per-line tax model in [`common`] and the
//! share-count iteration in [`solver`]; they differ in what is taxed and in
//! how the liability is assembled on each pass.

pub mod common;
pub mod option_exercise;
pub mod rsu_release;
pub mod solver;

pub use common::{format_fixed, round_money, tax_lines};
pub use option_exercise::calculate;
pub use rsu_release::calculate_rsu;
pub use solver::{FixedPoint, MAX_ITERATIONS, Solution};
