//! Movement-source arguments shared by the commands.

use anyhow::{Context, Result};
use clap::Args;
use pae_stock_client::{ClientConfig, FileMovementSource, HttpMovementSource, MovementSource};
use std::path::PathBuf;
use std::time::Duration;

/// Where to read movements from, and for which product.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON file holding a movement list (takes precedence over the API)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Base URL of the backend API
    #[arg(long, env = "PAE_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token for the backend API
    #[arg(long, env = "PAE_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PAE_API_TIMEOUT_SECS", value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Product to inspect
    #[arg(short, long)]
    pub product: String,

    /// Restrict to one institution
    #[arg(short, long)]
    pub institution: Option<i64>,
}

impl SourceArgs {
    /// Build the movement source these arguments describe.
    pub fn movement_source(&self) -> Result<Box<dyn MovementSource>> {
        if let Some(path) = &self.file {
            tracing::debug!("Reading movements from {}", path.display());
            return Ok(Box::new(FileMovementSource::new(path)));
        }

        let Some(url) = &self.api_url else {
            anyhow::bail!("no movement source: pass --file or --api-url (or set PAE_API_URL)");
        };

        let mut builder = ClientConfig::builder()
            .base_url(url)
            .timeout(Duration::from_secs(self.timeout));
        if let Some(token) = &self.token {
            builder = builder.token(token);
        }
        let config = builder.build().context("invalid API settings")?;

        tracing::debug!("Reading movements from {}", config.movements_url());
        Ok(Box::new(HttpMovementSource::new(config)))
    }
}
