//! Command-line front end for the sell-to-cover calculator.
//!
//! The binary in `main.rs` is a thin dispatcher; everything it needs lives
//! here so it can be tested without spawning a process.

pub mod keypad;
pub mod logging;
pub mod report;
pub mod settings;
pub mod utils;
