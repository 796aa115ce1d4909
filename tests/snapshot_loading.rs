mod common;

use std::fs;

use common::{ymd, SAMPLE_SNAPSHOT};
use forecast_core::billing::{BillingSchedule, ContractStatus, TransactionKind};
use forecast_core::utils::persistence::{
    load_snapshot, parse_snapshot, save_snapshot, SnapshotDocument,
};
use forecast_core::{FixedClock, ForecastError, RangeSpec, SnapshotError};
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn sample_snapshot_loads_typed_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, SAMPLE_SNAPSHOT).unwrap();

    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.contracts.len(), 3);
    assert_eq!(snapshot.transactions.len(), 3);

    let beta = &snapshot.contracts[1];
    assert_eq!(beta.amount, dec!(25));
    assert_eq!(beta.schedule, BillingSchedule::Weekly { step_weeks: 1 });
    assert_eq!(beta.next_bill_date, Some(ymd(2025, 1, 15)));
    assert_eq!(snapshot.contracts[2].status, ContractStatus::Cancelled);

    let refund = &snapshot.transactions[1];
    assert_eq!(refund.kind, TransactionKind::Return);
    assert_eq!(refund.transaction_date, ymd(2025, 1, 3));
}

#[test]
fn loaded_snapshot_produces_a_report() {
    let snapshot = parse_snapshot(SAMPLE_SNAPSHOT).unwrap();
    let report = snapshot
        .forecast(&RangeSpec::preset("this_month"), &FixedClock::new(ymd(2025, 1, 15)))
        .unwrap();
    assert_eq!(report.actual_revenue.total, dec!(80));
    // Beta on 15, 22, 29 plus Acme on the 20th.
    assert_eq!(report.projected_revenue.total, dec!(175));
    assert_eq!(report.metrics.declined_transactions, 1);
}

#[test]
fn saved_documents_round_trip_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    let document: SnapshotDocument = serde_json::from_str(SAMPLE_SNAPSHOT).unwrap();

    save_snapshot(&document, &path).unwrap();
    assert!(!path.with_extension("tmp").exists());

    let reread: SnapshotDocument =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reread, document);
    assert_eq!(load_snapshot(&path).unwrap(), parse_snapshot(SAMPLE_SNAPSHOT).unwrap());
}

#[test]
fn missing_sections_default_to_empty() {
    let snapshot = parse_snapshot("{}").unwrap();
    assert!(snapshot.contracts.is_empty());
    assert!(snapshot.transactions.is_empty());
}

#[test]
fn unparseable_dates_surface_as_forecast_errors() {
    let json = r#"{
        "transactions": [
            { "amount": 5, "status": "Approved", "transactionDate": "next tuesday" }
        ]
    }"#;
    let err = parse_snapshot(json).unwrap_err();
    assert!(matches!(
        err,
        SnapshotError::Forecast(ForecastError::InvalidDateFormat(ref raw)) if raw == "next tuesday"
    ));
}

#[test]
fn malformed_json_and_missing_files_are_reported() {
    assert!(matches!(parse_snapshot("{ nope"), Err(SnapshotError::Serde(_))));

    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(load_snapshot(&missing), Err(SnapshotError::Io(_))));
}
