//! Configuration for the backend client.

use crate::error::ClientError;
use std::fmt;
use std::time::Duration;

/// Default timeout for a movement-log request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the movement-log endpoint, relative to the API base URL.
pub const MOVEMENTS_PATH: &str = "/inventory/movements/";

/// Connection settings for the school-feeding backend.
///
/// The bearer token is an explicit value handed to the client; nothing is
/// read from process-wide state.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash (e.g. `https://pae.example/api`).
    pub base_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Global timeout for one request, connect to last body byte.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Full URL of the movement-log endpoint.
    #[must_use]
    pub fn movements_url(&self) -> String {
        format!("{}{MOVEMENTS_PATH}", self.base_url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token. An empty token means no authentication.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if the base URL is missing or
    /// not an `http(s)` URL, or if the timeout is zero.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let raw = self
            .base_url
            .ok_or_else(|| ClientError::InvalidConfig("missing base URL".to_string()))?;
        let base_url = raw.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got {raw:?}"
            )));
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let token = self
            .token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(ClientConfig {
            base_url,
            token,
            timeout,
        })
    }
}
