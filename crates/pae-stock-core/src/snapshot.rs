//! Point-in-time view of available stock.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Batch;

/// Unit reported when no batch remains.
pub const DEFAULT_UNIT: &str = "unidad";

/// Available stock of one product, split into batches.
///
/// Snapshots are recomputed from the movement log on every read and never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Product the snapshot describes.
    pub product_id: String,
    /// Institution the snapshot was requested for, if any.
    pub institution_id: Option<i64>,
    /// Sum of all batches' available quantity.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_available: Decimal,
    /// Most frequent unit among the batches.
    pub unit: String,
    /// Batches with stock left.
    pub batches: Vec<Batch>,
}

impl StockSnapshot {
    /// A snapshot with no stock.
    #[must_use]
    pub fn empty(product_id: impl Into<String>, institution_id: Option<i64>) -> Self {
        Self {
            product_id: product_id.into(),
            institution_id,
            total_available: Decimal::ZERO,
            unit: DEFAULT_UNIT.to_string(),
            batches: Vec::new(),
        }
    }

    /// Build a snapshot from reconciled batches.
    ///
    /// Batches without positive stock are dropped; the remaining ones keep
    /// their order.
    #[must_use]
    pub fn from_batches(
        product_id: impl Into<String>,
        institution_id: Option<i64>,
        batches: Vec<Batch>,
    ) -> Self {
        let batches: Vec<Batch> = batches.into_iter().filter(Batch::has_stock).collect();
        let total_available = batches
            .iter()
            .fold(Decimal::ZERO, |total, b| total.saturating_add(b.available_quantity));
        let unit = modal_unit(&batches).unwrap_or(DEFAULT_UNIT).to_string();

        Self {
            product_id: product_id.into(),
            institution_id,
            total_available,
            unit,
            batches,
        }
    }

    /// Whether there is no stock at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Batches whose goods expire on or before `now + horizon`.
    ///
    /// Already expired batches are included. A horizon reaching past the
    /// representable calendar includes every batch with an expiration date.
    /// Sorted by expiration date, soonest first.
    #[must_use]
    pub fn expiring_within(&self, now: DateTime<Utc>, horizon: TimeDelta) -> Vec<&Batch> {
        let limit = now.checked_add_signed(horizon);
        let mut expiring: Vec<&Batch> = self
            .batches
            .iter()
            .filter(|b| {
                b.expiration_date
                    .is_some_and(|e| limit.map_or(true, |limit| e <= limit))
            })
            .collect();
        expiring.sort_by_key(|b| b.expiration_date);
        expiring
    }
}

/// Most frequent unit; ties go to the unit seen first.
fn modal_unit(batches: &[Batch]) -> Option<&str> {
    // unit -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, batch) in batches.iter().enumerate() {
        counts.entry(batch.unit.as_str()).or_insert((0, pos)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (a_count, a_pos)), (_, (b_count, b_pos))| {
            a_count.cmp(b_count).then(b_pos.cmp(a_pos))
        })
        .map(|(unit, _)| unit)
}
