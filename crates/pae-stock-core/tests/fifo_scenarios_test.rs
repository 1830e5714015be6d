//! End-to-end reconstruction scenarios.
//!
//! Each test replays a small movement log through the public API and checks
//! the resulting snapshot batch by batch.

use chrono::{DateTime, TimeZone, Utc};
use pae_stock_core::{
    reconstruct, reconstruct_with_report, LocationFilter, MovementRecord, MovementType,
    StockSnapshot, SYSTEM_REASON,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, d, 10, 0, 0).unwrap()
}

fn receipt(id: &str, qty: Decimal, unit: &str, location: &str, d: u32) -> MovementRecord {
    MovementRecord::new(id, MovementType::Receipt, "arroz", 5, qty, unit, day(d)).with_location(location)
}

fn usage(id: &str, qty: Decimal, unit: &str, location: &str, d: u32) -> MovementRecord {
    MovementRecord::new(id, MovementType::Usage, "arroz", 5, qty, unit, day(d)).with_location(location)
}

fn snapshot_of(movements: &[MovementRecord]) -> StockSnapshot {
    reconstruct(movements, "arroz", Some(5), &LocationFilter::Any)
}

fn available(snapshot: &StockSnapshot, id: &str) -> Option<Decimal> {
    snapshot
        .batches
        .iter()
        .find(|b| b.inventory_id == id)
        .map(|b| b.available_quantity)
}

#[test]
fn receipt_then_partial_usage_leaves_remainder() {
    let snapshot = snapshot_of(&[
        receipt("r", dec!(40), "kg", "X", 1),
        usage("u", dec!(15), "kg", "X", 2),
    ]);

    assert_eq!(snapshot.batches.len(), 1);
    assert_eq!(available(&snapshot, "r"), Some(dec!(25)));
}

#[test]
fn oldest_batch_is_consumed_first() {
    let snapshot = snapshot_of(&[
        receipt("r2", dec!(10), "kg", "X", 2),
        receipt("r1", dec!(10), "kg", "X", 1),
        usage("u", dec!(15), "kg", "X", 3),
    ]);

    // r1 is fully consumed and therefore dropped from the output
    assert_eq!(available(&snapshot, "r1"), None);
    assert_eq!(available(&snapshot, "r2"), Some(dec!(5)));
}

#[test]
fn usage_never_crosses_units() {
    let snapshot = snapshot_of(&[
        receipt("kilos", dec!(10), "kg", "X", 1),
        receipt("units", dec!(10), "unidad", "X", 1),
        usage("u", dec!(25), "kg", "X", 2),
    ]);

    assert_eq!(available(&snapshot, "kilos"), None);
    assert_eq!(available(&snapshot, "units"), Some(dec!(10)));
    assert_eq!(snapshot.unit, "unidad");
}

#[test]
fn usage_never_crosses_locations() {
    let snapshot = snapshot_of(&[
        receipt("bodega", dec!(10), "kg", "Bodega", 1),
        receipt("cocina", dec!(10), "kg", "Cocina", 2),
        usage("u", dec!(4), "kg", "Cocina", 3),
    ]);

    assert_eq!(available(&snapshot, "bodega"), Some(dec!(10)));
    assert_eq!(available(&snapshot, "cocina"), Some(dec!(6)));
}

#[test]
fn unspecified_location_is_its_own_group() {
    let unplaced = MovementRecord::new("n", MovementType::Receipt, "arroz", 5, dec!(10), "kg", day(1));
    let unplaced_usage = MovementRecord::new("u", MovementType::Usage, "arroz", 5, dec!(3), "kg", day(2));

    let snapshot = snapshot_of(&[
        receipt("placed", dec!(10), "kg", "X", 1),
        unplaced,
        unplaced_usage,
    ]);

    assert_eq!(available(&snapshot, "placed"), Some(dec!(10)));
    assert_eq!(available(&snapshot, "n"), Some(dec!(7)));
}

#[test]
fn system_movements_have_no_effect() {
    let base = vec![
        receipt("r", dec!(10), "kg", "X", 1),
        usage("u", dec!(2), "kg", "X", 2),
    ];
    let mut with_system = base.clone();
    with_system.push(receipt("sys-in", dec!(100), "kg", "X", 3).with_reason(SYSTEM_REASON));
    with_system.push(usage("sys-out", dec!(8), "kg", "X", 4).with_reason(SYSTEM_REASON));

    assert_eq!(snapshot_of(&base), snapshot_of(&with_system));
}

#[test]
fn three_movement_scenario() {
    let snapshot = snapshot_of(&[
        receipt("A", dec!(100), "kg", "X", 1),
        receipt("B", dec!(50), "kg", "X", 2),
        usage("U", dec!(120), "kg", "X", 3),
    ]);

    assert_eq!(available(&snapshot, "A"), None);
    assert_eq!(available(&snapshot, "B"), Some(dec!(30)));
    assert_eq!(snapshot.total_available, dec!(30));
    assert_eq!(snapshot.unit, "kg");
}

#[test]
fn empty_log_gives_empty_snapshot() {
    let snapshot = snapshot_of(&[]);

    assert_eq!(snapshot.total_available, Decimal::ZERO);
    assert_eq!(snapshot.unit, "unidad");
    assert!(snapshot.batches.is_empty());

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["total_available"], serde_json::json!(0.0));
    assert_eq!(json["unit"], "unidad");
    assert_eq!(json["batches"], serde_json::json!([]));
}

#[test]
fn adjustment_tops_up_matching_lot() {
    let snapshot = snapshot_of(&[
        receipt("r", dec!(20), "kg", "X", 1).with_lot("L1"),
        MovementRecord::new("adj", MovementType::Adjustment, "arroz", 5, dec!(5), "kg", day(2))
            .with_location("X")
            .with_lot("L1"),
    ]);

    assert_eq!(snapshot.batches.len(), 1);
    assert_eq!(available(&snapshot, "r"), Some(dec!(25)));
}

#[test]
fn overdraw_is_reported_but_not_applied() {
    let result = reconstruct_with_report(
        &[
            receipt("r", dec!(5), "kg", "X", 1),
            usage("u", dec!(9), "kg", "X", 2),
            receipt("later", dec!(3), "kg", "X", 3),
        ],
        "arroz",
        Some(5),
        &LocationFilter::Any,
    );

    // Receipts recorded after the usage still absorb it
    assert!(result.snapshot.is_empty());
    assert!(!result.is_consistent());
    assert_eq!(result.shortfalls[0].requested, dec!(9));
    assert_eq!(result.shortfalls[0].unmet, dec!(1));
}

#[test]
fn location_filter_scopes_the_whole_log() {
    let movements = vec![
        receipt("x", dec!(10), "kg", "X", 1),
        receipt("y", dec!(10), "kg", "Y", 1),
        usage("ux", dec!(3), "kg", "X", 2),
    ];

    let only_y = reconstruct(&movements, "arroz", Some(5), &LocationFilter::Named("Y".into()));
    assert_eq!(only_y.total_available, dec!(10));
    assert_eq!(available(&only_y, "y"), Some(dec!(10)));

    let only_x = reconstruct(&movements, "arroz", Some(5), &LocationFilter::Named("X".into()));
    assert_eq!(only_x.total_available, dec!(7));
}

#[test]
fn wire_log_reconstructs() {
    let json = r#"[
        {"_id": "1", "movement_type": "receipt", "product_id": "leche", "institution_id": 8,
         "storage_location": "Bodega", "quantity": 12, "unit": "unidad", "lot": "L-9",
         "expiration_date": "2024-10-01", "reference_id": "inv-1", "reference_type": "inventory",
         "movement_date": "2024-09-01T08:00:00", "reason": null},
        {"_id": "2", "movement_type": "usage", "product_id": "leche", "institution_id": 8,
         "storage_location": "Bodega", "quantity": 5, "unit": "unidad",
         "movement_date": "2024-09-02T08:00:00Z", "reason": "menu"},
        {"_id": "3", "movement_type": "adjustment", "product_id": "leche", "institution_id": 8,
         "storage_location": "Bodega", "quantity": 40, "unit": "unidad",
         "movement_date": "2024-09-03T08:00:00Z", "reason": "SYSTEM"}
    ]"#;

    let movements: Vec<MovementRecord> = serde_json::from_str(json).unwrap();
    let snapshot = reconstruct(&movements, "leche", Some(8), &LocationFilter::Any);

    assert_eq!(snapshot.total_available, dec!(7));
    assert_eq!(snapshot.batches[0].inventory_id, "inv-1");
    assert_eq!(snapshot.batches[0].lot.as_deref(), Some("L-9"));
    assert!(snapshot.batches[0].expiration_date.is_some());
}
