use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use stc_cli::keypad::{KeypadState, parse_keys};
use stc_cli::utils::parse_decimal;
use stc_cli::{logging, report, settings};
use stc_core::{Calculator, OptionInput, RsuInput};
use stc_data::{InputLoader, ResultWriter};
use tracing::{debug, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Sell-to-cover calculator for stock option exercises and RSU releases.
///
/// Works out how many whole shares must be sold to pay the taxes and broker
/// fees an equity event creates.
#[derive(Debug, Parser)]
#[command(name = "stc", version, about, long_about = None)]
struct Cli {
    /// TOML file with `[tax_rates]` and `[broker_fees]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `warn,stc_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Size the sale for a stock option exercise.
    Exercise {
        /// Strike price per share.
        #[arg(long, value_parser = parse_decimal)]
        price: Decimal,

        /// Number of options exercised.
        #[arg(long, value_parser = parse_decimal)]
        shares: Decimal,

        /// Fair market value per share on the exercise date.
        #[arg(long, value_parser = parse_decimal)]
        fmv: Decimal,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Size the sale for a restricted stock unit release.
    Release {
        /// Number of units released.
        #[arg(long, value_parser = parse_decimal)]
        shares: Decimal,

        /// Fair market value per share at vest.
        #[arg(long, value_parser = parse_decimal)]
        vest_price: Decimal,

        /// Expected sale price per share.
        #[arg(long, value_parser = parse_decimal)]
        sale_price: Decimal,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run every option exercise in a CSV file and export the results.
    Batch {
        /// CSV with exercise price, exercised shares and FMV columns.
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the results CSV. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Press calculator keys and print the display, e.g. `stc keys 2+3*4=`.
    Keys {
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
}

// ─── commands ────────────────────────────────────────────────────────────────

fn exercise(
    calculator: &Calculator,
    input: OptionInput,
    json: bool,
) -> Result<()> {
    let result = calculator
        .calculate(&input)
        .context("Failed to size the option exercise")?;

    if json {
        println!("{}", result.to_json()?);
    } else {
        print!("{}", report::render_option(&result));
    }
    Ok(())
}

fn release(
    calculator: &Calculator,
    input: RsuInput,
    json: bool,
) -> Result<()> {
    let result = calculator
        .calculate_rsu(&input)
        .context("Failed to size the RSU release")?;

    if json {
        println!("{}", result.to_json()?);
    } else {
        print!("{}", report::render_rsu(&result));
    }
    Ok(())
}

fn batch(
    calculator: &Calculator,
    input: PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    info!("Loading exercises from: {}", input.display());
    let inputs = InputLoader::load_from_file(&input)
        .with_context(|| format!("Failed to import: {}", input.display()))?;
    debug!(count = inputs.len(), "parsed inputs");

    let batch = calculator
        .calculate_batch(&inputs)
        .context("Batch calculation failed")?;

    match &output {
        Some(path) => {
            ResultWriter::write_to_file(&batch.results, path)
                .with_context(|| format!("Failed to export: {}", path.display()))?;
            info!("Wrote {} results to: {}", batch.len(), path.display());
        }
        None => ResultWriter::write(&batch.results, io::stdout().lock())
            .context("Failed to write results to stdout")?,
    }

    eprintln!("{}", batch.summarize());
    Ok(())
}

fn keys(tokens: &[String]) -> Result<()> {
    let keys = parse_keys(tokens)?;
    let state = KeypadState::default().press_all(&keys)?;
    println!("{state}");
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = settings::load(cli.config.as_deref())?;
    let calculator = Calculator::new(config);

    match cli.command {
        Command::Exercise {
            price,
            shares,
            fmv,
            json,
        } => exercise(
            &calculator,
            OptionInput {
                exercise_price: price,
                exercised_shares: shares,
                fmv,
            },
            json,
        ),
        Command::Release {
            shares,
            vest_price,
            sale_price,
            json,
        } => release(
            &calculator,
            RsuInput {
                shares_released: shares,
                vest_price,
                sale_price,
            },
            json,
        ),
        Command::Batch { input, output } => batch(&calculator, input, output),
        Command::Keys { keys: tokens } => keys(&tokens),
    }
}
