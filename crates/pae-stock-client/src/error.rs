//! Errors raised while fetching movement logs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while obtaining a movement log.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The requested URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: Box<ureq::Error>,
    },

    /// The backend answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The response body is not a movement list.
    #[error("invalid movement list from {url}: {source}")]
    Decode {
        /// The requested URL.
        url: String,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// IO error reading a movement file.
    #[error("failed to read file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A movement file does not contain a movement list.
    #[error("invalid movement file {path}: {source}")]
    Json {
        /// The offending file.
        path: PathBuf,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The client configuration is unusable.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Whether this error came from the network side rather than from
    /// configuration or local files.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Status { .. } | Self::Decode { .. }
        )
    }
}
