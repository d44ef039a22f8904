//! CSV export of option exercise results.
//!
//! The first three columns mirror the import layout, so an exported file is
//! itself a valid batch input. Money columns carry two decimal places and
//! share columns carry four.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use stc_core::OptionResult;
use stc_core::calculations::format_fixed;
use thiserror::Error;
use tracing::debug;

/// Column names written as the first row of every export.
pub const EXPORT_HEADER: [&str; 11] = [
    "Exercise Price",
    "Exercised Shares",
    "FMV",
    "Shares To Sell",
    "Net Shares",
    "Total Costs",
    "Est. Gross Proceeds",
    "Taxable Gain",
    "Total Tax",
    "Option Cost",
    "Broker Fees",
];

const MONEY_PLACES: u32 = 2;
const SHARE_PLACES: u32 = 4;

/// Errors that can occur while exporting results.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Writer for batch results as CSV.
pub struct ResultWriter;

impl ResultWriter {
    /// Write the header followed by one row per result, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Csv`] if the underlying writer fails.
    pub fn write<W: Write>(
        results: &[OptionResult],
        writer: W,
    ) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(EXPORT_HEADER)?;

        for result in results {
            csv_writer.write_record(row(result))?;
        }

        csv_writer.flush().map_err(csv::Error::from)?;
        debug!(rows = results.len(), "exported results");
        Ok(())
    }

    /// Create (or truncate) `path` and write `results` into it.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] when the file cannot be created, or any
    /// error from [`ResultWriter::write`].
    pub fn write_to_file(
        results: &[OptionResult],
        path: &Path,
    ) -> Result<(), ExportError> {
        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::write(results, file)
    }
}

fn row(result: &OptionResult) -> [String; 11] {
    let money = |value| format_fixed(value, MONEY_PLACES);
    let shares = |value| format_fixed(value, SHARE_PLACES);

    [
        money(result.exercise_price),
        shares(result.exercised_shares),
        money(result.fmv),
        shares(result.shares_to_sell),
        shares(result.net_shares),
        money(result.total_costs),
        money(result.est_gross_proceeds),
        money(result.taxable_gain),
        money(result.total_tax),
        money(result.option_cost),
        money(result.broker_fees),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use stc_core::{Calculator, OptionInput};

    use super::*;

    fn worked_example() -> OptionResult {
        Calculator::default()
            .calculate(&OptionInput {
                exercise_price: dec!(10.00),
                exercised_shares: dec!(100),
                fmv: dec!(50.00),
            })
            .unwrap()
    }

    fn export_to_string(results: &[OptionResult]) -> String {
        let mut buffer = Vec::new();
        ResultWriter::write(results, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn write_emits_header_for_empty_results() {
        let csv = export_to_string(&[]);

        assert_eq!(
            csv,
            "Exercise Price,Exercised Shares,FMV,Shares To Sell,Net Shares,Total Costs,\
             Est. Gross Proceeds,Taxable Gain,Total Tax,Option Cost,Broker Fees\n"
        );
    }

    #[test]
    fn write_formats_money_and_share_columns() {
        let csv = export_to_string(&[worked_example()]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "10.00,100.0000,50.00,45.0000,55.0000,2211.00,2250.00,4000.00,1186.00,1000.00,25.00"
        );
    }

    #[test]
    fn write_keeps_result_order() {
        let first = worked_example();
        let second = Calculator::default()
            .calculate(&OptionInput {
                exercise_price: dec!(1.00),
                exercised_shares: dec!(10),
                fmv: dec!(2.00),
            })
            .unwrap();

        let csv = export_to_string(&[first, second]);
        let prices: Vec<&str> = csv
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .collect();

        assert_eq!(prices, vec!["10.00", "1.00"]);
    }

    #[test]
    fn write_to_unwritable_path_is_io_error() {
        let result = ResultWriter::write_to_file(
            &[],
            Path::new("/this/path/does/not/exist/out.csv"),
        );

        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
