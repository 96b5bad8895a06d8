//! Duplicate dates cannot be created through the store's insert path, but a
//! baseline shipped with duplicates must come out clean: reported, then
//! collapsed to a single occurrence.

use serde_json::json;

use mhdb_integrity::{deduplicate_and_repair, IntegrityIssue};
use mhdb_schemas::{EntryKey, MhdbDocument};
use mhdb_store::CalendarStore;

fn es() -> EntryKey {
    "Future-cme-ES".parse().unwrap()
}

#[test]
fn baseline_duplicates_are_reported_and_collapsed() {
    let doc: MhdbDocument = serde_json::from_value(json!({
        "entries": {
            "Future-cme-ES": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": ["1/1/2024", "12/25/2024", "1/1/2024"],
                "bankHolidays": ["7/4/2024", "7/4/2024", "7/4/2024"]
            }
        }
    }))
    .unwrap();
    let mut store = CalendarStore::new(doc);

    let report = deduplicate_and_repair(&mut store);

    // One duplicated holiday (1 extra copy) + one duplicated bank holiday
    // (2 extra copies).
    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.repaired, 3);
    assert!(report
        .issues
        .iter()
        .any(|i| matches!(i, IntegrityIssue::DuplicateDate { count: 3, .. })));

    let record = store.entry(&es()).unwrap();
    let holidays: Vec<String> = record.holidays.iter().map(|d| d.to_string()).collect();
    assert_eq!(holidays, vec!["1/1/2024", "12/25/2024"]);
    assert_eq!(record.bank_holidays.as_ref().unwrap().len(), 1);
}

#[test]
fn clean_store_stays_untouched() {
    let doc: MhdbDocument = serde_json::from_value(json!({
        "entries": {
            "Future-cme-ES": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": ["1/1/2024", "12/25/2024"]
            }
        }
    }))
    .unwrap();
    let mut store = CalendarStore::new(doc);

    let report = deduplicate_and_repair(&mut store);
    assert!(report.is_clean());
    assert_eq!(report.repaired, 0);
    assert_eq!(store.entry(&es()).unwrap().holidays.len(), 2);
}
