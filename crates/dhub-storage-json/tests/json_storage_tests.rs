use std::{fs, path::PathBuf};

use chrono::{TimeZone, Utc};
use dhub_core::{storage::LedgerStorage, CoreError, DonationLedger, FixedClock};
use dhub_domain::{DonationCategory, DonationDraft, Region};
use dhub_storage_json::JsonLedgerStorage;
use tempfile::tempdir;

fn open(storage: JsonLedgerStorage) -> DonationLedger {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 14, 8, 0, 0).unwrap());
    DonationLedger::open_with_clock(Box::new(storage), Box::new(clock)).expect("open ledger")
}

fn draft(name: &str, amount: f64) -> DonationDraft {
    DonationDraft::new(name, amount, DonationCategory::Zakat, Region::J1)
}

fn tmp_path_for(path: &std::path::Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension("json.tmp");
    tmp
}

#[test]
fn missing_files_load_as_empty_ledger() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonLedgerStorage::new(dir.path().join("data")).expect("create storage");

    let stored = storage.load().expect("load empty");
    assert!(stored.records.is_empty());
    assert_eq!(stored.last_sequence, 0);
}

#[test]
fn restart_after_delete_continues_sequence() {
    let dir = tempdir().expect("tempdir");
    let data_dir = dir.path().join("data");

    let mut ledger = open(JsonLedgerStorage::new(data_dir.clone()).unwrap());
    let ids: Vec<_> = ["A", "B", "C"]
        .iter()
        .map(|name| ledger.insert(draft(name, 100.0)).unwrap().id)
        .collect();
    ledger.delete(ids[0]).unwrap();
    drop(ledger);

    let mut reopened = open(JsonLedgerStorage::new(data_dir).unwrap());
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.list()[0].id, ids[2]);
    let next = reopened.insert(draft("D", 100.0)).unwrap();
    assert_eq!(next.receipt_number.to_string(), "20250314-J1-0000004");
}

#[test]
fn sequence_is_stored_apart_from_records() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonLedgerStorage::new(dir.path().to_path_buf()).unwrap();
    let mut ledger = open(storage.clone());
    let record = ledger.insert(draft("A", 100.0)).unwrap();
    ledger.delete(record.id).unwrap();

    let records = fs::read_to_string(storage.records_path()).unwrap();
    let sequence = fs::read_to_string(storage.sequence_path()).unwrap();
    assert!(!records.contains(&record.receipt_number.to_string()));
    assert!(sequence.contains("\"last_sequence\": 1"));
}

#[test]
fn legacy_array_and_bare_counter_are_accepted() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonLedgerStorage::new(dir.path().to_path_buf()).unwrap();
    let mut ledger = open(storage.clone());
    ledger.insert(draft("A", 250.0)).unwrap();
    let records = ledger.list().to_vec();
    drop(ledger);

    fs::write(storage.records_path(), serde_json::to_string(&records).unwrap()).unwrap();
    fs::write(storage.sequence_path(), "7\n").unwrap();

    let stored = storage.load().expect("load legacy");
    assert_eq!(stored.records, records);
    assert_eq!(stored.last_sequence, 7);
}

#[test]
fn newer_schema_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonLedgerStorage::new(dir.path().to_path_buf()).unwrap();
    fs::write(
        storage.records_path(),
        r#"{ "schema_version": 99, "records": [] }"#,
    )
    .unwrap();

    let err = storage.load().expect_err("future schema");
    match err {
        CoreError::Persistence(message) => assert!(message.contains("newer"), "{message}"),
        other => panic!("expected persistence error, got {other:?}"),
    }
}

#[test]
fn failed_write_keeps_file_and_memory_in_step() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonLedgerStorage::new(dir.path().to_path_buf()).unwrap();
    let mut ledger = open(storage.clone());
    ledger.insert(draft("Seed", 100.0)).unwrap();
    let original = fs::read_to_string(storage.records_path()).unwrap();
    let before = ledger.list().to_vec();

    // A directory at the temp path makes File::create fail.
    let blocker = tmp_path_for(storage.records_path());
    fs::create_dir_all(&blocker).unwrap();

    let err = ledger.insert(draft("Ali", 500.0)).expect_err("write must fail");
    assert!(matches!(err, CoreError::Persistence(_)));
    assert_eq!(ledger.list(), before.as_slice());
    assert_eq!(fs::read_to_string(storage.records_path()).unwrap(), original);

    fs::remove_dir_all(&blocker).unwrap();
    let retried = ledger.insert(draft("Ali", 500.0)).expect("retry succeeds");
    assert_eq!(retried.receipt_number.sequence, 2);

    let stored = storage.load().unwrap();
    assert_eq!(stored.records.len(), 2);
    assert_eq!(stored.last_sequence, 2);
}

#[test]
fn failed_rename_removes_temp_file() {
    let dir = tempdir().expect("tempdir");
    let records_path = dir.path().join("records");
    fs::create_dir_all(records_path.join("occupied")).unwrap();
    let storage = JsonLedgerStorage::with_paths(records_path.clone(), dir.path().join("sequence"));

    let err = storage.save_records(&[]).expect_err("rename onto a directory fails");
    assert!(err.is_persistence());
    assert!(!dir.path().join("records.tmp").exists());
    assert!(records_path.is_dir());
}
