//! CSV import of option exercise inputs and export of batch results.

mod export;
mod import;

pub use export::{EXPORT_HEADER, ExportError, ResultWriter};
pub use import::{ImportError, InputLoader};
