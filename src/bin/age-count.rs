//! CLI tool to count people above an age threshold in a CSV file.
//!
//! Usage:
//!   age-count [input.csv] [--threshold N] [--reference-date YYYY-MM-DD]
//!
//! Diagnostics go to stderr through `tracing`; the count goes to stdout.

use age_pipeline::{Pipeline, PipelineConfig};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::process;
use tracing::{Level, debug, warn};
use tracing_subscriber::FmtSubscriber;

/// Count the people in a CSV file whose age exceeds a threshold.
///
/// The first row is a header. Field 4 of every other row must be a
/// birthdate formatted YYYY/MM/DD.
#[derive(Parser)]
#[command(name = "age-count")]
struct Cli {
    /// Input CSV file
    #[arg(default_value = "user.csv")]
    input: String,

    /// Count ages strictly greater than this
    #[arg(short, long, default_value_t = age_pipeline::DEFAULT_AGE_THRESHOLD)]
    threshold: i32,

    /// Measure ages on this date instead of today (YYYY-MM-DD)
    #[arg(short, long)]
    reference_date: Option<NaiveDate>,

    /// Rows buffered between reader and aggregator (0 = direct handoff)
    #[arg(short, long, default_value_t = 0)]
    capacity: usize,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Treat rows whose field count differs from the header as read errors
    #[arg(long)]
    strict: bool,

    /// Show debug diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error installing logger: {e}");
    }

    let Ok(delimiter) = u8::try_from(cli.delimiter) else {
        eprintln!("Error: delimiter '{}' is not a single-byte character", cli.delimiter);
        process::exit(1);
    };

    let reference = cli
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());

    let config = PipelineConfig::new()
        .with_reference_date(reference)
        .with_threshold(cli.threshold)
        .with_channel_capacity(cli.capacity)
        .with_delimiter(delimiter)
        .with_strict_field_count(cli.strict);

    let pipeline = match Pipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    debug!(input = %cli.input, reference = %reference, threshold = cli.threshold, "starting");

    match pipeline.run_path(&cli.input) {
        Ok(outcome) => {
            if !outcome.source_available() {
                warn!(input = %cli.input, "no header could be read; input is empty or unreadable");
            }
            println!(
                "Number of people above {} years old: {}",
                cli.threshold, outcome.count
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
