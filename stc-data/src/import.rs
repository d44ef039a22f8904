//! CSV loader for option exercise inputs.
//!
//! ## CSV Format
//!
//! The first row is a header and is skipped without inspecting its names.
//! Each following row supplies, by position:
//!
//! | Column | Field            | Type    |
//! |--------|------------------|---------|
//! | 1      | exercise price   | decimal |
//! | 2      | exercised shares | decimal |
//! | 3      | FMV              | decimal |
//!
//! Further columns are ignored, so a file written by
//! [`ResultWriter`](crate::ResultWriter) can be read straight back in. Rows
//! with fewer than three fields are skipped. A field that is not a number
//! fails the whole import.
//!
//! ```csv
//! Exercise Price,Exercised Shares,FMV
//! 10.00,100,50.00
//! 0.42,12500,18.37
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use stc_core::OptionInput;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while importing inputs.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input had no header row at all.
    #[error("CSV input is empty; expected a header row")]
    MissingHeader,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A numeric cell could not be parsed. `row` is the 1-based data row
    /// (the header is row 0).
    #[error("invalid {field} '{value}' on row {row}: {source}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

const FIELDS: [&str; 3] = ["exercise price", "exercised shares", "FMV"];

/// Loader for option exercise inputs from CSV.
pub struct InputLoader;

impl InputLoader {
    /// Parse inputs from any CSV reader, in file order.
    ///
    /// # Errors
    ///
    /// * [`ImportError::MissingHeader`] for empty input.
    /// * [`ImportError::InvalidField`] for the first unparsable number.
    /// * [`ImportError::Csv`] for structurally broken CSV.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use stc_data::InputLoader;
    ///
    /// let csv = "price,shares,fmv\n10.00,100,50.00\n";
    /// let inputs = InputLoader::parse(csv.as_bytes()).unwrap();
    ///
    /// assert_eq!(inputs.len(), 1);
    /// assert_eq!(inputs[0].fmv, dec!(50.00));
    /// ```
    pub fn parse<R: Read>(reader: R) -> Result<Vec<OptionInput>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // short rows are skipped, not rejected
            .trim(csv::Trim::All)
            .from_reader(reader);

        if csv_reader.headers()?.is_empty() {
            return Err(ImportError::MissingHeader);
        }

        let mut inputs = Vec::new();

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = idx + 1;

            if record.len() < FIELDS.len() {
                debug!(row, fields = record.len(), "skipping short row");
                continue;
            }

            let mut values = [Decimal::ZERO; 3];
            for (column, field) in FIELDS.iter().enumerate() {
                values[column] = parse_field(&record[column], field, row)?;
            }
            let [exercise_price, exercised_shares, fmv] = values;

            inputs.push(OptionInput {
                exercise_price,
                exercised_shares,
                fmv,
            });
        }

        debug!(count = inputs.len(), "imported inputs");
        Ok(inputs)
    }

    /// Convenience wrapper: open `path` and delegate to [`InputLoader::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Io`] when the file cannot be opened, or any
    /// error from [`InputLoader::parse`].
    pub fn load_from_file(path: &Path) -> Result<Vec<OptionInput>, ImportError> {
        let file = File::open(path).map_err(|source| ImportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(file)
    }
}

fn parse_field(
    value: &str,
    field: &'static str,
    row: usize,
) -> Result<Decimal, ImportError> {
    value
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|source| ImportError::InvalidField {
            row,
            field,
            value: value.to_string(),
            source,
        })
}
