//! Core types and stock reconstruction for school-feeding inventories.
//!
//! This crate derives the available stock of a product from its raw movement
//! log. It performs no I/O:
//!
//! - [`MovementRecord`] - One receipt, usage, adjustment, expiration or loss
//! - [`Batch`] - A lot of stock that entered through one receipt
//! - [`GroupKey`] - The unit/location pair that scopes FIFO consumption
//! - [`LocationFilter`] - Restricts a reconstruction to one storage location
//! - [`StockSnapshot`] - The derived, point-in-time stock of a product
//! - [`reconstruct`] - Replays the movement log into a snapshot
//!
//! # Example
//!
//! ```
//! use pae_stock_core::{reconstruct, LocationFilter, MovementRecord, MovementType};
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//!
//! let day = |d| Utc.with_ymd_and_hms(2024, 2, d, 7, 0, 0).unwrap();
//!
//! let movements = vec![
//!     MovementRecord::new("r1", MovementType::Receipt, "frijol", 3, dec!(20), "kg", day(1))
//!         .with_lot("L1"),
//!     MovementRecord::new("a1", MovementType::Adjustment, "frijol", 3, dec!(5), "kg", day(2))
//!         .with_lot("L1"),
//! ];
//!
//! let snapshot = reconstruct(&movements, "frijol", Some(3), &LocationFilter::Any);
//! assert_eq!(snapshot.total_available, dec!(25));
//! assert_eq!(snapshot.unit, "kg");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod movement;
pub mod reconstruct;
pub mod snapshot;
pub mod wire;

pub use batch::{normalize_location, Batch, GroupKey, LocationFilter, ADJUSTMENT_BATCH_PREFIX};
pub use movement::{visible_movements, MovementRecord, MovementType, SYSTEM_REASON};
pub use reconstruct::{reconstruct, reconstruct_with_report, Reconstruction, Shortfall};
pub use snapshot::{StockSnapshot, DEFAULT_UNIT};

// Re-export commonly used external types
pub use chrono::{DateTime, Utc};
pub use rust_decimal::Decimal;
