//! Parent/child reconciliation: a date the generic `[*]` entry already
//! carries is redundant on a specific contract's entry. The parent wins;
//! the child's copy is dropped — for all four collections when both sides
//! track them.

use serde_json::json;

use mhdb_integrity::{check, reconcile_with_parent};
use mhdb_schemas::{EntryKey, MhdbDocument};
use mhdb_store::CalendarStore;

fn es() -> EntryKey {
    "Future-cme-ES".parse().unwrap()
}

fn generic() -> EntryKey {
    "Future-cme-[*]".parse().unwrap()
}

#[test]
fn child_holiday_also_on_parent_is_dropped_from_child() {
    let doc: MhdbDocument = serde_json::from_value(json!({
        "entries": {
            "Future-cme-[*]": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": ["1/1/2024", "12/25/2024"]
            },
            "Future-cme-ES": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": ["1/1/2024", "7/4/2024"]
            }
        }
    }))
    .unwrap();
    let mut store = CalendarStore::new(doc);

    let report = reconcile_with_parent(&mut store);
    assert_eq!(report.repaired, 1);

    let child: Vec<String> = store
        .entry(&es())
        .unwrap()
        .holidays
        .iter()
        .map(|d| d.to_string())
        .collect();
    assert_eq!(child, vec!["7/4/2024"]);

    // Parent untouched.
    assert_eq!(store.entry(&generic()).unwrap().holidays.len(), 2);

    // Disjointness holds afterwards.
    let parent_holidays = &store.entry(&generic()).unwrap().holidays;
    assert!(store
        .entry(&es())
        .unwrap()
        .holidays
        .iter()
        .all(|d| !parent_holidays.contains(d)));
}

#[test]
fn timed_collections_reconcile_only_when_both_sides_track_them() {
    let doc: MhdbDocument = serde_json::from_value(json!({
        "entries": {
            "Future-cme-[*]": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": [],
                "earlyCloses": { "12/24/2024": "12:15:00" }
            },
            "Future-cme-ES": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": [],
                "earlyCloses": { "12/24/2024": "13:00:00", "11/29/2024": "12:05:00" },
                "lateOpens": { "1/2/2024": "09:30:00" }
            }
        }
    }))
    .unwrap();
    let mut store = CalendarStore::new(doc);

    let report = reconcile_with_parent(&mut store);
    assert_eq!(report.repaired, 1);

    let record = store.entry(&es()).unwrap();
    let ec = record.early_closes.as_ref().unwrap();
    // Overlapping 12/24 dropped from the child even though the times differ;
    // child-only 11/29 kept.
    assert!(!ec.contains_key(&"12/24/2024".parse().unwrap()));
    assert!(ec.contains_key(&"11/29/2024".parse().unwrap()));
    // Parent has no lateOpens, so the child's survive.
    assert_eq!(record.late_opens.as_ref().unwrap().len(), 1);
}

#[test]
fn entry_without_parent_is_left_alone() {
    let doc: MhdbDocument = serde_json::from_value(json!({
        "entries": {
            "Future-nymex-CL": {
                "exchangeTimeZone": "America/New_York",
                "holidays": ["1/1/2024"]
            }
        }
    }))
    .unwrap();
    let mut store = CalendarStore::new(doc);

    let report = reconcile_with_parent(&mut store);
    assert!(report.is_clean());

    let key: EntryKey = "Future-nymex-CL".parse().unwrap();
    assert_eq!(store.entry(&key).unwrap().holidays.len(), 1);
}

#[test]
fn full_check_runs_all_three_passes() {
    let doc: MhdbDocument = serde_json::from_value(json!({
        "entries": {
            "Future-cme-[*]": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": ["1/1/2024"]
            },
            "Future-cme-ES": {
                "exchangeTimeZone": "America/Chicago",
                "holidays": ["1/1/2024", "12/25/2024", "12/25/2024"],
                "earlyCloses": { "12/25/2024": "12:15:00" }
            }
        }
    }))
    .unwrap();
    let mut store = CalendarStore::new(doc);

    let report = check(&mut store);

    // duplicate 12/25 repaired, 12/25 holiday/earlyClose overlap reported,
    // 1/1 parent overlap repaired.
    assert_eq!(report.repaired, 2);
    assert_eq!(report.unrepaired_overlaps(), 1);

    let holidays: Vec<String> = store
        .entry(&es())
        .unwrap()
        .holidays
        .iter()
        .map(|d| d.to_string())
        .collect();
    assert_eq!(holidays, vec!["12/25/2024"]);
}
