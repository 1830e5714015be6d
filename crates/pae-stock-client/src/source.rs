//! Where movement logs come from.
//!
//! The reconstructor only needs the raw movement list of one product; a
//! [`MovementSource`] produces it, either from the backend over HTTP or from
//! a JSON export on disk.

use crate::config::ClientConfig;
use crate::error::ClientError;
use pae_stock_core::MovementRecord;
use std::fs;
use std::path::{Path, PathBuf};
use ureq::Agent;

/// A provider of raw movement logs.
pub trait MovementSource {
    /// Fetch every movement of a product, optionally scoped to one
    /// institution. The list is returned unordered and unfiltered apart from
    /// that scope.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the log cannot be obtained.
    fn fetch_movements(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
    ) -> Result<Vec<MovementRecord>, ClientError>;

    /// Source name, for log messages.
    fn name(&self) -> &'static str;
}

impl<T: MovementSource + ?Sized> MovementSource for Box<T> {
    fn fetch_movements(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
    ) -> Result<Vec<MovementRecord>, ClientError> {
        (**self).fetch_movements(product_id, institution_id)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Movement log served by the backend's `/inventory/movements/` endpoint.
pub struct HttpMovementSource {
    config: ClientConfig,
    agent: Agent,
}

impl HttpMovementSource {
    /// Create a source for the given backend.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();
        Self {
            config,
            agent: Agent::new_with_config(agent_config),
        }
    }

    /// The configuration this source was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl MovementSource for HttpMovementSource {
    fn fetch_movements(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
    ) -> Result<Vec<MovementRecord>, ClientError> {
        let url = self.config.movements_url();
        tracing::debug!("Fetching movements for {} from {}", product_id, url);

        let mut request = self
            .agent
            .get(&url)
            .query("product_id", product_id)
            .header("Accept", "application/json");
        if let Some(institution) = institution_id {
            request = request.query("institution_id", institution.to_string());
        }
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let mut response = request.call().map_err(|e| ClientError::Transport {
            url: url.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            // No movements recorded yet for this product
            tracing::debug!("No movement log for {} (404)", product_id);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ClientError::Transport {
                url: url.clone(),
                source: Box::new(e),
            })?;
        let movements: Vec<MovementRecord> =
            serde_json::from_str(&body).map_err(|source| ClientError::Decode { url, source })?;

        tracing::debug!("Fetched {} movements for {}", movements.len(), product_id);
        Ok(movements)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Movement log read from a JSON file holding an array of movements.
///
/// The file may mix products and institutions; only the requested scope is
/// returned.
#[derive(Debug, Clone)]
pub struct FileMovementSource {
    path: PathBuf,
}

impl FileMovementSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<MovementRecord>, ClientError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ClientError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ClientError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl MovementSource for FileMovementSource {
    fn fetch_movements(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
    ) -> Result<Vec<MovementRecord>, ClientError> {
        let movements: Vec<MovementRecord> = self
            .read_all()?
            .into_iter()
            .filter(|m| m.product_id == product_id)
            .filter(|m| institution_id.is_none_or(|id| m.institution_id == id))
            .collect();

        tracing::debug!(
            "Read {} movements for {} from {}",
            movements.len(),
            product_id,
            self.path.display()
        );
        Ok(movements)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
