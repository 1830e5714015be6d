//! The `pstock-*` commands.
//!
//! `snapshot_cmd` and `log_cmd` each expose a `main` used by the binaries
//! under `src/bin/`, plus a `run_with_writer` that tests drive directly.
//! Both read movements through [`source_args::SourceArgs`].

pub mod log_cmd;
pub mod snapshot_cmd;
pub mod source_args;

use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "pae_stock=info";

/// Output format shared by the commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for scripts and other tools
    Json,
}

/// Initialize logging to stderr.
///
/// `RUST_LOG` takes precedence over [`DEFAULT_LOG_FILTER`]; `verbose` forces
/// debug output for this workspace's crates.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pae_stock=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    // Keep an already-installed subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
