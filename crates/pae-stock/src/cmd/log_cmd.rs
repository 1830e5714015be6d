//! pstock-log - Show the movement log of a product.
//!
//! Internal bookkeeping movements are hidden; the newest movement comes
//! first.
//!
//! # Usage
//!
//! ```bash
//! pstock-log --file movements.json --product arroz
//! pstock-log -p arroz -i 12 --limit 20 --format json
//! ```

use super::source_args::SourceArgs;
use super::OutputFormat;
use anyhow::{Context, Result};
use clap::Parser;
use pae_stock_client::StockService;
use pae_stock_core::MovementRecord;
use std::io::{self, Write};
use std::process::ExitCode;

/// Show the visible movement log of a product, newest first.
#[derive(Parser, Debug)]
#[command(name = "pstock-log")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    source: SourceArgs,

    /// Show at most this many movements
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the log command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    super::init_tracing(args.verbose);

    let mut stdout = io::stdout().lock();
    match run_with_writer(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Run the log command, writing to `writer`.
pub fn run_with_writer<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    let product = args.source.product.as_str();
    let service = StockService::new(args.source.movement_source()?);

    let mut movements = service
        .movement_log(product, args.source.institution)
        .with_context(|| format!("failed to load movements for {product}"))?;
    if let Some(limit) = args.limit {
        movements.truncate(limit);
    }

    match args.format {
        OutputFormat::Text => write_text(&movements, writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, &movements)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn write_text<W: Write>(movements: &[MovementRecord], writer: &mut W) -> Result<()> {
    if movements.is_empty() {
        writeln!(writer, "No movements.")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{:<16} {:<10} {:>12} {:<8} {:<16} {:<10} {}",
        "Date", "Type", "Quantity", "Unit", "Location", "Lot", "Reason"
    )?;
    for m in movements {
        writeln!(
            writer,
            "{:<16} {:<10} {:>12} {:<8} {:<16} {:<10} {}",
            m.movement_date.format("%Y-%m-%d %H:%M").to_string(),
            m.movement_type.as_str(),
            m.quantity.normalize().to_string(),
            m.unit,
            m.storage_location.as_deref().unwrap_or("-"),
            m.lot.as_deref().unwrap_or("-"),
            m.reason.as_deref().unwrap_or(""),
        )?;
    }
    writeln!(writer, "\n{} movement(s)", movements.len())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const LOG: &str = r#"[
        {"_id": "a", "movement_type": "receipt", "product_id": "leche", "institution_id": 1,
         "quantity": 24, "unit": "unidad", "movement_date": "2024-07-01T07:30:00Z"},
        {"_id": "b", "movement_type": "usage", "product_id": "leche", "institution_id": 1,
         "quantity": 6, "unit": "unidad", "movement_date": "2024-07-02T11:00:00Z", "reason": "menu"},
        {"_id": "c", "movement_type": "adjustment", "product_id": "leche", "institution_id": 1,
         "quantity": 3, "unit": "unidad", "movement_date": "2024-07-03T09:00:00Z", "reason": "SYSTEM"}
    ]"#;

    fn run(extra: &[&str]) -> String {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), LOG).unwrap();

        let path = file.path().to_str().unwrap();
        let mut argv = vec!["pstock-log", "-f", path, "-p", "leche"];
        argv.extend_from_slice(extra);
        let args = Args::try_parse_from(argv).unwrap();

        let mut out = Vec::new();
        run_with_writer(&args, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_log_hides_system() {
        let out = run(&[]);

        assert!(out.contains("usage"));
        assert!(out.contains("receipt"));
        assert!(!out.contains("SYSTEM"));
        assert!(out.contains("2 movement(s)"));
        // Newest first
        assert!(out.find("usage").unwrap() < out.find("receipt").unwrap());
    }

    #[test]
    fn test_json_log_with_limit() {
        let out = run(&["--format", "json", "-n", "1"]);

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["_id"], "b");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let args = Args::try_parse_from(["pstock-log", "-f", "/nonexistent.json", "-p", "leche"])
            .unwrap();
        let err = run_with_writer(&args, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load movements for leche"));
    }
}
