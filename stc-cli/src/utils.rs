use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and drops commas used as thousands separators.
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a command-line number into a [`Decimal`].
///
/// Accepts `"1,234.56"` as well as plain `"1234.56"`. Empty input is 0,
/// which the engine then rejects for fields that must be positive.
/// Returns an error and logs when the input is not a number.
///
/// Used directly as a clap `value_parser`.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|source| {
        tracing::error!(input = %s, "invalid decimal: {}", source);
        ParseDecimalError {
            input: s.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("12,500").unwrap(), dec!(12500));
    }

    #[test]
    fn parse_decimal_trims_whitespace() {
        assert_eq!(parse_decimal("  50.00  ").unwrap(), dec!(50.00));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_names_the_input() {
        let err = parse_decimal("ten").unwrap_err();

        assert!(err.to_string().starts_with("invalid decimal 'ten'"));
    }

    #[test]
    fn parse_decimal_logs_invalid_input() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || parse_decimal("12.5.0"));

        assert!(result.is_err());
        let logged = captured.text();
        assert!(logged.contains("ERROR"));
        assert!(logged.contains("invalid decimal"));
        assert!(logged.contains("input=12.5.0"));
    }

    #[test]
    fn parse_decimal_valid_input_logs_nothing() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || parse_decimal("1,000"));

        assert_eq!(result.unwrap(), dec!(1000));
        assert!(captured.text().is_empty());
    }
}
