//! Inventory movement records.
//!
//! A [`MovementRecord`] is one append-only event in the stock history of a
//! product: a receipt, a usage, an adjustment, an expiration or a loss.
//! Records arrive from the backend unordered; the reconstructor derives
//! stock from them (see [`crate::reconstruct`]).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason marking internal bookkeeping movements.
///
/// Movements carrying this reason are hidden from the movement log and
/// ignored by reconstruction.
pub const SYSTEM_REASON: &str = "SYSTEM";

/// Kind of inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods received; creates a batch.
    Receipt,
    /// Goods consumed (e.g. served in a menu).
    Usage,
    /// Manual correction; the sign of the quantity gives the direction.
    Adjustment,
    /// Goods discarded because they expired.
    Expired,
    /// Goods lost or damaged.
    Loss,
    /// A movement type this client does not know about. Ignored.
    #[serde(other)]
    Unknown,
}

impl MovementType {
    /// Whether this type always removes stock.
    ///
    /// Adjustments are excluded: their direction depends on the quantity sign.
    #[must_use]
    pub const fn is_outbound(self) -> bool {
        matches!(self, Self::Usage | Self::Expired | Self::Loss)
    }

    /// Whether this type always adds stock.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        matches!(self, Self::Receipt)
    }

    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Usage => "usage",
            Self::Adjustment => "adjustment",
            Self::Expired => "expired",
            Self::Loss => "loss",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single inventory movement as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    /// Unique record identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Product this movement belongs to.
    pub product_id: String,
    /// Institution (site) the movement happened at.
    pub institution_id: i64,
    /// Storage location; `None` means unspecified.
    #[serde(default)]
    pub storage_location: Option<String>,
    /// Amount moved. Only adjustments are meaningfully signed.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub quantity: Decimal,
    /// Unit of measure (e.g. `kg`, `unidad`).
    pub unit: String,
    /// Lot label, if any.
    #[serde(default)]
    pub lot: Option<String>,
    /// Expiration date of the goods, if known.
    #[serde(default, deserialize_with = "crate::wire::optional_timestamp")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// Identifier linking the movement to the batch it created or touched.
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Kind of entity `reference_id` points to.
    #[serde(default)]
    pub reference_type: Option<String>,
    /// When the movement happened. Defines FIFO order.
    #[serde(deserialize_with = "crate::wire::timestamp")]
    pub movement_date: DateTime<Utc>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Reason code; [`SYSTEM_REASON`] marks internal bookkeeping.
    #[serde(default)]
    pub reason: Option<String>,
    /// User who recorded the movement.
    #[serde(default)]
    pub created_by: Option<String>,
    /// When the record was written.
    #[serde(default, deserialize_with = "crate::wire::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MovementRecord {
    /// Create a movement with the required fields set and everything else empty.
    ///
    /// ```
    /// use pae_stock_core::{MovementRecord, MovementType};
    /// use chrono::{TimeZone, Utc};
    /// use rust_decimal_macros::dec;
    ///
    /// let m = MovementRecord::new(
    ///     "m1",
    ///     MovementType::Receipt,
    ///     "arroz",
    ///     7,
    ///     dec!(25),
    ///     "kg",
    ///     Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
    /// )
    /// .with_location("Bodega 1")
    /// .with_lot("L-001");
    ///
    /// assert_eq!(m.storage_location.as_deref(), Some("Bodega 1"));
    /// assert!(!m.is_system());
    /// ```
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        movement_type: MovementType,
        product_id: impl Into<String>,
        institution_id: i64,
        quantity: Decimal,
        unit: impl Into<String>,
        movement_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            movement_type,
            product_id: product_id.into(),
            institution_id,
            storage_location: None,
            quantity,
            unit: unit.into(),
            lot: None,
            expiration_date: None,
            reference_id: None,
            reference_type: None,
            movement_date,
            notes: None,
            reason: None,
            created_by: None,
            created_at: None,
        }
    }

    /// Set the storage location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.storage_location = Some(location.into());
        self
    }

    /// Set the lot label.
    #[must_use]
    pub fn with_lot(mut self, lot: impl Into<String>) -> Self {
        self.lot = Some(lot.into());
        self
    }

    /// Set the reference identifier.
    #[must_use]
    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Set the reason code.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the expiration date.
    #[must_use]
    pub fn with_expiration(mut self, expiration_date: DateTime<Utc>) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    /// Whether this is an internal bookkeeping movement.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.reason.as_deref() == Some(SYSTEM_REASON)
    }

    /// Whether this movement removes stock.
    #[must_use]
    pub fn is_consumption(&self) -> bool {
        self.movement_type.is_outbound()
            || (self.movement_type == MovementType::Adjustment && self.quantity < Decimal::ZERO)
    }

    /// Whether this movement is an adjustment that adds stock.
    #[must_use]
    pub fn is_positive_adjustment(&self) -> bool {
        self.movement_type == MovementType::Adjustment && self.quantity > Decimal::ZERO
    }

    /// Identifier of the batch this receipt creates.
    #[must_use]
    pub fn batch_key(&self) -> &str {
        self.reference_id.as_deref().unwrap_or(&self.id)
    }
}

/// The user-facing movement log.
///
/// Drops [`SYSTEM_REASON`] movements and orders the rest newest first.
/// Movements sharing a timestamp keep their input order.
#[must_use]
pub fn visible_movements(movements: &[MovementRecord]) -> Vec<MovementRecord> {
    let mut visible: Vec<MovementRecord> = movements
        .iter()
        .filter(|m| !m.is_system())
        .cloned()
        .collect();
    visible.sort_by(|a, b| b.movement_date.cmp(&a.movement_date));
    visible
}
