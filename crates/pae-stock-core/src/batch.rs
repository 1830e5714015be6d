//! Batches (lots) of stock and the keys that group them.
//!
//! A [`Batch`] is a traceable quantity of product that entered through one
//! receipt. Batches only ever exchange stock with movements that share their
//! [`GroupKey`]: the same unit of measure at the same storage location.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MovementRecord;

/// Prefix of batch identifiers synthesized for unmatched positive adjustments.
pub const ADJUSTMENT_BATCH_PREFIX: &str = "ADJ-";

/// Normalize a raw storage location.
///
/// Missing, empty and whitespace-only locations all mean "unspecified".
#[must_use]
pub fn normalize_location(location: Option<&str>) -> Option<&str> {
    location.filter(|l| !l.trim().is_empty())
}

/// Composite key scoping FIFO consumption: unit of measure plus location.
///
/// Kept as a struct rather than a joined string so that units or locations
/// containing any separator can never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    /// Unit of measure.
    pub unit: String,
    /// Normalized storage location; `None` is the unspecified location.
    pub location: Option<String>,
}

impl GroupKey {
    /// Build a key, normalizing the location.
    #[must_use]
    pub fn new(unit: impl Into<String>, location: Option<&str>) -> Self {
        Self {
            unit: unit.into(),
            location: normalize_location(location).map(str::to_string),
        }
    }

    /// The key a movement's quantity belongs to.
    #[must_use]
    pub fn of(movement: &MovementRecord) -> Self {
        Self::new(movement.unit.as_str(), movement.storage_location.as_deref())
    }

    /// Check whether a unit/location pair falls under this key.
    #[must_use]
    pub fn matches(&self, unit: &str, location: Option<&str>) -> bool {
        self.unit == unit && self.location.as_deref() == normalize_location(location)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} @ {location}", self.unit),
            None => write!(f, "{} @ (unspecified)", self.unit),
        }
    }
}

/// Which storage locations a reconstruction looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocationFilter {
    /// Every location, including unspecified ones.
    #[default]
    Any,
    /// Only movements without a location.
    Unspecified,
    /// Only movements at exactly this location.
    Named(String),
}

impl LocationFilter {
    /// Check whether a movement at `location` passes the filter.
    ///
    /// ```
    /// use pae_stock_core::LocationFilter;
    ///
    /// let cold_room = LocationFilter::Named("Cuarto frío".into());
    /// assert!(cold_room.admits(Some("Cuarto frío")));
    /// assert!(!cold_room.admits(Some("Bodega")));
    /// assert!(!cold_room.admits(None));
    ///
    /// assert!(LocationFilter::Unspecified.admits(None));
    /// assert!(LocationFilter::Any.admits(None));
    /// ```
    #[must_use]
    pub fn admits(&self, location: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Unspecified => normalize_location(location).is_none(),
            Self::Named(name) => normalize_location(location) == Some(name.as_str()),
        }
    }
}

impl From<Option<String>> for LocationFilter {
    fn from(location: Option<String>) -> Self {
        location.map_or(Self::Any, Self::Named)
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("all locations"),
            Self::Unspecified => f.write_str("unspecified location"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A lot of stock derived from the movement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Batch identifier (receipt reference, receipt id, or synthetic).
    pub inventory_id: String,
    /// Lot label.
    pub lot: Option<String>,
    /// Quantity still available.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub available_quantity: Decimal,
    /// Unit of measure.
    pub unit: String,
    /// Storage location as recorded on the originating movement.
    pub storage_location: Option<String>,
    /// Institution holding the batch.
    pub institution_id: i64,
    /// Expiration date of the goods.
    pub expiration_date: Option<DateTime<Utc>>,
    /// When the batch entered stock. Defines FIFO order.
    pub date_of_admission: DateTime<Utc>,
}

impl Batch {
    /// Seed a batch from a receipt movement.
    #[must_use]
    pub fn from_receipt(receipt: &MovementRecord) -> Self {
        Self::from_movement(receipt, receipt.batch_key().to_string())
    }

    /// Synthesize a batch for a positive adjustment that matched no batch.
    #[must_use]
    pub fn from_adjustment(adjustment: &MovementRecord) -> Self {
        let inventory_id = adjustment.reference_id.clone().unwrap_or_else(|| {
            format!("{ADJUSTMENT_BATCH_PREFIX}{}", adjustment.id)
        });
        Self::from_movement(adjustment, inventory_id)
    }

    fn from_movement(movement: &MovementRecord, inventory_id: String) -> Self {
        Self {
            inventory_id,
            lot: movement.lot.clone(),
            available_quantity: movement.quantity,
            unit: movement.unit.clone(),
            storage_location: movement.storage_location.clone(),
            institution_id: movement.institution_id,
            expiration_date: movement.expiration_date,
            date_of_admission: movement.movement_date,
        }
    }

    /// The consumption group this batch belongs to.
    #[must_use]
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.unit.as_str(), self.storage_location.as_deref())
    }

    /// Whether this batch is in group `key`.
    #[must_use]
    pub fn in_group(&self, key: &GroupKey) -> bool {
        key.matches(&self.unit, self.storage_location.as_deref())
    }

    /// Whether the batch has stock left.
    #[must_use]
    pub fn has_stock(&self) -> bool {
        self.available_quantity > Decimal::ZERO
    }

    /// Whether the goods are past their expiration date at `now`.
    ///
    /// Batches without an expiration date never expire.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|expires| expires < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MovementType;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_group_key_normalizes_blank_location() {
        assert_eq!(GroupKey::new("kg", Some("  ")), GroupKey::new("kg", None));
        assert_ne!(GroupKey::new("kg", Some("A")), GroupKey::new("kg", None));
        assert_ne!(GroupKey::new("kg", None), GroupKey::new("unidad", None));
    }

    #[test]
    fn test_group_key_no_separator_collision() {
        // "kg|A" + "" must not equal "kg" + "A|"
        assert_ne!(
            GroupKey::new("kg|A", Some("B")),
            GroupKey::new("kg", Some("A|B"))
        );
    }

    #[test]
    fn test_group_key_display() {
        assert_eq!(GroupKey::new("kg", Some("Bodega")).to_string(), "kg @ Bodega");
        assert_eq!(GroupKey::new("kg", None).to_string(), "kg @ (unspecified)");
    }

    #[test]
    fn test_location_filter_from_option() {
        assert_eq!(LocationFilter::from(None), LocationFilter::Any);
        assert_eq!(
            LocationFilter::from(Some("A".to_string())),
            LocationFilter::Named("A".to_string())
        );
    }

    #[test]
    fn test_unspecified_filter_treats_blank_as_missing() {
        assert!(LocationFilter::Unspecified.admits(Some("")));
        assert!(!LocationFilter::Unspecified.admits(Some("Bodega")));
    }

    #[test]
    fn test_batch_from_receipt_uses_reference() {
        let receipt = MovementRecord::new("r1", MovementType::Receipt, "p", 4, dec!(10), "kg", at(2))
            .with_reference("inv-1")
            .with_lot("L1")
            .with_location("Bodega")
            .with_expiration(at(30));

        let batch = Batch::from_receipt(&receipt);
        assert_eq!(batch.inventory_id, "inv-1");
        assert_eq!(batch.lot.as_deref(), Some("L1"));
        assert_eq!(batch.available_quantity, dec!(10));
        assert_eq!(batch.institution_id, 4);
        assert_eq!(batch.date_of_admission, at(2));
        assert_eq!(batch.key(), GroupKey::new("kg", Some("Bodega")));
    }

    #[test]
    fn test_batch_from_adjustment_synthetic_id() {
        let adj = MovementRecord::new("m9", MovementType::Adjustment, "p", 1, dec!(3), "kg", at(5));
        assert_eq!(Batch::from_adjustment(&adj).inventory_id, "ADJ-m9");

        let adj = adj.with_reference("inv-7");
        assert_eq!(Batch::from_adjustment(&adj).inventory_id, "inv-7");
    }

    #[test]
    fn test_is_expired() {
        let receipt = MovementRecord::new("r1", MovementType::Receipt, "p", 1, dec!(1), "kg", at(1))
            .with_expiration(at(10));
        let batch = Batch::from_receipt(&receipt);
        assert!(!batch.is_expired(at(9)));
        assert!(batch.is_expired(at(11)));

        let no_expiry = Batch::from_receipt(&MovementRecord::new(
            "r2",
            MovementType::Receipt,
            "p",
            1,
            dec!(1),
            "kg",
            at(1),
        ));
        assert!(!no_expiry.is_expired(at(28)));
    }
}
