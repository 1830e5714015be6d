//! pstock-snapshot - Show the stock of a product, batch by batch.
//!
//! # Usage
//!
//! ```bash
//! pstock-snapshot --file movements.json --product arroz
//! pstock-snapshot -p arroz -i 12 --location "Bodega 1" --expiring-within 14
//! pstock-snapshot -p arroz --format json --strict
//! ```
//!
//! # Exit codes
//!
//! - `0` - Snapshot printed
//! - `1` - The command failed (bad arguments, unreadable source in `--strict` mode)
//! - `2` - `--strict` and the movement log consumes more than it received

use super::source_args::SourceArgs;
use super::OutputFormat;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use pae_stock_client::StockService;
use pae_stock_core::{Batch, LocationFilter, Reconstruction, Shortfall, StockSnapshot};
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;

/// Show the current FIFO stock of a product.
#[derive(Parser, Debug)]
#[command(name = "pstock-snapshot")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    source: SourceArgs,

    /// Only count stock stored at this location
    #[arg(short, long, conflicts_with = "unspecified_location")]
    location: Option<String>,

    /// Only count stock with no recorded location
    #[arg(long)]
    unspecified_location: bool,

    /// Also list batches expiring within this many days
    #[arg(long, value_name = "DAYS")]
    expiring_within: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Fail instead of degrading when the log is unreadable or inconsistent
    #[arg(long)]
    strict: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn location_filter(&self) -> LocationFilter {
        if self.unspecified_location {
            LocationFilter::Unspecified
        } else {
            LocationFilter::from(self.location.clone())
        }
    }
}

/// JSON shape of the command output.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    snapshot: &'a StockSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiring: Option<Vec<&'a Batch>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    shortfalls: Vec<&'a Shortfall>,
}

/// Main entry point for the snapshot command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    super::init_tracing(args.verbose);

    let mut stdout = io::stdout().lock();
    match run_with_writer(&args, Utc::now(), &mut stdout) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Run the snapshot command, writing to `writer`.
///
/// Returns the process exit status.
pub fn run_with_writer<W: Write>(args: &Args, now: DateTime<Utc>, writer: &mut W) -> Result<u8> {
    let product = args.source.product.as_str();
    let institution = args.source.institution;
    let filter = args.location_filter();
    let service = StockService::new(args.source.movement_source()?);

    let result = if args.strict {
        service
            .try_reconstruction(product, institution, &filter)
            .with_context(|| format!("failed to load movements for {product}"))?
    } else {
        service.reconstruction(product, institution, &filter)
    };

    let expiring = args
        .expiring_within
        .map(|days| result.snapshot.expiring_within(now, TimeDelta::days(i64::from(days))));

    match args.format {
        OutputFormat::Text => write_text(&result, &filter, expiring.as_deref(), now, writer)?,
        OutputFormat::Json => {
            let output = JsonOutput {
                snapshot: &result.snapshot,
                expiring,
                shortfalls: result.shortfalls.iter().collect(),
            };
            serde_json::to_writer_pretty(&mut *writer, &output)?;
            writeln!(writer)?;
        }
    }

    if args.strict && !result.is_consistent() {
        eprintln!(
            "error: movement log for {product} is inconsistent ({} shortfall(s))",
            result.shortfalls.len()
        );
        return Ok(2);
    }

    Ok(0)
}

fn write_text<W: Write>(
    result: &Reconstruction,
    filter: &LocationFilter,
    expiring: Option<&[&Batch]>,
    now: DateTime<Utc>,
    writer: &mut W,
) -> Result<()> {
    let snapshot = &result.snapshot;

    write!(writer, "Product: {}", snapshot.product_id)?;
    if let Some(institution) = snapshot.institution_id {
        write!(writer, "  Institution: {institution}")?;
    }
    if *filter != LocationFilter::Any {
        write!(writer, "  Location: {filter}")?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "Available: {} {}",
        snapshot.total_available.normalize(),
        snapshot.unit
    )?;

    if snapshot.batches.is_empty() {
        writeln!(writer, "No batches in stock.")?;
    } else {
        writeln!(writer)?;
        writeln!(
            writer,
            "{:<16} {:<10} {:<16} {:>12} {:<8} {:<10} {:<10}",
            "Batch", "Lot", "Location", "Available", "Unit", "Expires", "Admitted"
        )?;
        for batch in &snapshot.batches {
            writeln!(
                writer,
                "{:<16} {:<10} {:<16} {:>12} {:<8} {:<10} {:<10}",
                batch.inventory_id,
                batch.lot.as_deref().unwrap_or("-"),
                batch.storage_location.as_deref().unwrap_or("-"),
                batch.available_quantity.normalize().to_string(),
                batch.unit,
                batch
                    .expiration_date
                    .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
                batch.date_of_admission.format("%Y-%m-%d").to_string(),
            )?;
        }
    }

    if let Some(expiring) = expiring {
        writeln!(writer)?;
        if expiring.is_empty() {
            writeln!(writer, "No batches expiring soon.")?;
        } else {
            writeln!(writer, "Expiring soon:")?;
            for batch in expiring {
                let state = if batch.is_expired(now) { " (expired)" } else { "" };
                if let Some(date) = batch.expiration_date {
                    writeln!(
                        writer,
                        "  {} {}: {} {}{state}",
                        date.format("%Y-%m-%d"),
                        batch.inventory_id,
                        batch.available_quantity.normalize(),
                        batch.unit,
                    )?;
                }
            }
        }
    }

    if !result.shortfalls.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Shortfalls (not applied):")?;
        for shortfall in &result.shortfalls {
            writeln!(writer, "  {shortfall}")?;
        }
    }

    Ok(())
}
