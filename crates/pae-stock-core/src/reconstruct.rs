//! Stock reconstruction from the movement log.
//!
//! Stock is never stored: every read replays the full, unordered movement
//! log of a product and derives the batches that remain. The replay runs in
//! ordered passes:
//!
//! 1. drop `SYSTEM` movements and movements outside the location filter;
//! 2. seed one batch per receipt, keyed by `reference_id`, falling back to
//!    the movement id (a later receipt with the same key replaces the
//!    earlier one);
//! 3. total the consumption demand (usages, expirations, losses and
//!    negative adjustments) per [`GroupKey`];
//! 4. consume each group's demand from its batches, oldest admission first,
//!    never taking a batch below zero;
//! 5. apply positive adjustments, topping up the first batch with the same
//!    unit, location and lot, or creating a new batch;
//! 6. keep the batches that still hold stock.
//!
//! Reconstruction is total: inconsistent logs degrade (demand without supply
//! is dropped, duplicate keys overwrite) instead of failing. Demand that could
//! not be served is reported as a [`Shortfall`] but does not affect the
//! snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::{Batch, GroupKey, LocationFilter, MovementRecord, MovementType, StockSnapshot};

/// Consumption demand that exceeded the stock of its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    /// The unit/location group the demand was recorded against.
    pub key: GroupKey,
    /// Total demand recorded for the group.
    pub requested: Decimal,
    /// Part of the demand no batch could absorb.
    pub unmet: Decimal,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} consumed but only {} available",
            self.key,
            self.requested,
            self.key.unit,
            self.requested - self.unmet
        )
    }
}

/// A snapshot together with the diagnostics found while deriving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    /// The derived stock.
    pub snapshot: StockSnapshot,
    /// Groups whose consumption exceeded supply, ordered by key.
    pub shortfalls: Vec<Shortfall>,
}

impl Reconstruction {
    /// Whether the movement log reconciled without shortfalls.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

/// Derive the available stock of a product from its movement log.
///
/// # Example
///
/// ```
/// use pae_stock_core::{reconstruct, LocationFilter, MovementRecord, MovementType};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let day = |d| Utc.with_ymd_and_hms(2024, 4, d, 8, 0, 0).unwrap();
/// let movements = vec![
///     MovementRecord::new("a", MovementType::Receipt, "leche", 1, dec!(100), "kg", day(1)),
///     MovementRecord::new("b", MovementType::Receipt, "leche", 1, dec!(50), "kg", day(2)),
///     MovementRecord::new("c", MovementType::Usage, "leche", 1, dec!(120), "kg", day(3)),
/// ];
///
/// let snapshot = reconstruct(&movements, "leche", Some(1), &LocationFilter::Any);
/// assert_eq!(snapshot.total_available, dec!(30));
/// assert_eq!(snapshot.batches.len(), 1);
/// assert_eq!(snapshot.batches[0].inventory_id, "b");
/// ```
#[must_use]
pub fn reconstruct(
    movements: &[MovementRecord],
    product_id: &str,
    institution_id: Option<i64>,
    filter: &LocationFilter,
) -> StockSnapshot {
    reconstruct_with_report(movements, product_id, institution_id, filter).snapshot
}

/// Like [`reconstruct`], also reporting groups whose demand exceeded supply.
#[must_use]
pub fn reconstruct_with_report(
    movements: &[MovementRecord],
    product_id: &str,
    institution_id: Option<i64>,
    filter: &LocationFilter,
) -> Reconstruction {
    let relevant: Vec<&MovementRecord> = movements
        .iter()
        .filter(|m| !m.is_system() && filter.admits(m.storage_location.as_deref()))
        .collect();

    let mut ledger = Ledger::default();
    for receipt in relevant
        .iter()
        .filter(|m| m.movement_type == MovementType::Receipt)
    {
        ledger.seed(Batch::from_receipt(receipt));
    }

    let mut demand: BTreeMap<GroupKey, Decimal> = BTreeMap::new();
    for movement in relevant.iter().filter(|m| m.is_consumption()) {
        let total = demand.entry(GroupKey::of(movement)).or_default();
        *total = total.saturating_add(movement.quantity.abs());
    }

    let mut shortfalls = Vec::new();
    for (key, requested) in demand {
        if requested.is_zero() {
            continue;
        }
        let unmet = ledger.consume_fifo(&key, requested);
        if unmet > Decimal::ZERO {
            shortfalls.push(Shortfall {
                key,
                requested,
                unmet,
            });
        }
    }

    for adjustment in relevant.iter().filter(|m| m.is_positive_adjustment()) {
        ledger.augment(adjustment);
    }

    Reconstruction {
        snapshot: StockSnapshot::from_batches(product_id, institution_id, ledger.into_batches()),
        shortfalls,
    }
}

/// Working set of batches, in seeding order, addressable by inventory id.
#[derive(Debug, Default)]
struct Ledger {
    batches: Vec<Batch>,
    index: HashMap<String, usize>,
}

impl Ledger {
    /// Insert a batch. A batch with the same inventory id is replaced in place.
    fn seed(&mut self, batch: Batch) {
        if let Some(&idx) = self.index.get(&batch.inventory_id) {
            self.batches[idx] = batch;
        } else {
            self.index.insert(batch.inventory_id.clone(), self.batches.len());
            self.batches.push(batch);
        }
    }

    /// Consume `demand` from the batches of `key`, oldest first.
    ///
    /// Returns the part of the demand that could not be served.
    fn consume_fifo(&mut self, key: &GroupKey, demand: Decimal) -> Decimal {
        let mut indices: Vec<usize> = self
            .batches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.in_group(key))
            .map(|(i, _)| i)
            .collect();

        // Stable: batches admitted at the same instant keep seeding order
        indices.sort_by_key(|&i| self.batches[i].date_of_admission);

        let mut remaining = demand;
        for idx in indices {
            if remaining.is_zero() {
                break;
            }

            let batch = &mut self.batches[idx];
            if !batch.has_stock() {
                continue;
            }

            let take = remaining.min(batch.available_quantity);
            batch.available_quantity -= take;
            remaining -= take;
        }

        remaining
    }

    /// Apply a positive adjustment.
    ///
    /// Tops up the first batch with the same unit, location and lot. Without
    /// one, a new batch is opened; if its id is already taken, the existing
    /// batch absorbs the quantity instead of being replaced.
    fn augment(&mut self, adjustment: &MovementRecord) {
        let key = GroupKey::of(adjustment);
        let matched = self
            .batches
            .iter()
            .position(|b| b.in_group(&key) && b.lot == adjustment.lot);

        let batch = Batch::from_adjustment(adjustment);
        let idx = match matched.or_else(|| self.index.get(&batch.inventory_id).copied()) {
            Some(idx) => idx,
            None => {
                self.seed(batch);
                return;
            }
        };

        let target = &mut self.batches[idx];
        target.available_quantity = target.available_quantity.saturating_add(adjustment.quantity);
    }

    fn into_batches(self) -> Vec<Batch> {
        self.batches
    }
}
