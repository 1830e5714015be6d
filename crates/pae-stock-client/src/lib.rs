//! Movement sources and stock service for school-feeding inventories.
//!
//! This crate connects the pure reconstructor in [`pae_stock_core`] to the
//! places movement logs live:
//!
//! - [`MovementSource`] - Anything that can produce a product's movement log
//! - [`HttpMovementSource`] - The backend's `/inventory/movements/` endpoint
//! - [`FileMovementSource`] - A JSON export on disk
//! - [`StockService`] - Fetch + reconstruct, degrading to an empty snapshot
//!   when the log is unavailable
//!
//! # Example
//!
//! ```no_run
//! use pae_stock_client::{ClientConfig, HttpMovementSource, StockService};
//! use pae_stock_core::LocationFilter;
//!
//! let config = ClientConfig::builder()
//!     .base_url("https://pae.example/api")
//!     .token("session-token")
//!     .build()?;
//! let service = StockService::new(HttpMovementSource::new(config));
//!
//! let snapshot = service.snapshot("arroz", Some(12), &LocationFilter::Any);
//! println!("{} {}", snapshot.total_available, snapshot.unit);
//! # Ok::<(), pae_stock_client::ClientError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod service;
pub mod source;

pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_TIMEOUT, MOVEMENTS_PATH};
pub use error::ClientError;
pub use service::StockService;
pub use source::{FileMovementSource, HttpMovementSource, MovementSource};
