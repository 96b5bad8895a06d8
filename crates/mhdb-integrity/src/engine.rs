use std::collections::BTreeSet;

use tracing::{info, warn};

use mhdb_schemas::MhdbDate;
use mhdb_store::{CalendarStore, CollectionKind, DateCollection, TimedCollection};

use crate::{IntegrityIssue, IntegrityReport};

/// Collapse duplicate dates within every list collection of every entry.
/// The insert path cannot create duplicates; the baseline itself can carry
/// them. Timed collections are date-keyed maps and are skipped.
pub fn deduplicate_and_repair(store: &mut CalendarStore) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    for key in store.entry_keys() {
        for collection in [DateCollection::Holidays, DateCollection::BankHolidays] {
            for (date, count) in store.dedup_collection(&key, collection) {
                warn!(
                    "duplicated {} {} date {} (x{}); collapsed to one",
                    key,
                    CollectionKind::from(collection),
                    date,
                    count
                );
                report.repaired += count - 1;
                report.issues.push(IntegrityIssue::DuplicateDate {
                    key: key.clone(),
                    collection: collection.into(),
                    date,
                    count,
                });
            }
        }
    }
    report
}

/// Report dates that appear both in an entry's holidays and in one of its
/// other collections. A full holiday and a partial-schedule event on the
/// same date contradict each other; which one is right is an authoring
/// question, so nothing is repaired here.
pub fn report_holiday_overlaps(store: &CalendarStore) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    for key in store.entry_keys() {
        let Some(record) = store.entry(&key) else {
            continue;
        };
        let holidays: BTreeSet<MhdbDate> = record.holidays.iter().copied().collect();
        if holidays.is_empty() {
            continue;
        }

        let mut overlaps: Vec<(CollectionKind, MhdbDate)> = Vec::new();
        if let Some(bank) = &record.bank_holidays {
            for date in bank.iter().filter(|d| holidays.contains(d)) {
                overlaps.push((CollectionKind::BankHolidays, *date));
            }
        }
        if let Some(map) = &record.early_closes {
            for date in map.keys().filter(|d| holidays.contains(d)) {
                overlaps.push((CollectionKind::EarlyCloses, *date));
            }
        }
        if let Some(map) = &record.late_opens {
            for date in map.keys().filter(|d| holidays.contains(d)) {
                overlaps.push((CollectionKind::LateOpens, *date));
            }
        }

        for (collection, date) in overlaps {
            warn!(
                "{}: {} is both a holiday and in {}; left for review",
                key, date, collection
            );
            report.issues.push(IntegrityIssue::HolidayEventOverlap {
                key: key.clone(),
                collection,
                date,
            });
        }
    }
    report
}

/// For every entry with an existing generic parent, drop from the child any
/// date its parent already carries in the same collection. The parent's
/// record applies to every specific contract, so the child's copy is
/// redundant.
pub fn reconcile_with_parent(store: &mut CalendarStore) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    for key in store.entry_keys() {
        if key.is_generic() {
            continue;
        }
        let parent = key.generic();

        // Collect overlaps first; mutation below invalidates the borrows.
        let mut date_overlaps: Vec<(DateCollection, MhdbDate)> = Vec::new();
        let mut timed_overlaps: Vec<(TimedCollection, MhdbDate)> = Vec::new();
        {
            let Some(child_rec) = store.entry(&key) else {
                continue;
            };
            let Some(parent_rec) = store.entry(&parent) else {
                continue;
            };

            let parent_holidays: BTreeSet<MhdbDate> =
                parent_rec.holidays.iter().copied().collect();
            for date in &child_rec.holidays {
                if parent_holidays.contains(date) {
                    date_overlaps.push((DateCollection::Holidays, *date));
                }
            }

            if let (Some(child), Some(parent)) =
                (&child_rec.bank_holidays, &parent_rec.bank_holidays)
            {
                let parent: BTreeSet<MhdbDate> = parent.iter().copied().collect();
                for date in child.iter().filter(|d| parent.contains(d)) {
                    date_overlaps.push((DateCollection::BankHolidays, *date));
                }
            }
            if let (Some(child), Some(parent)) =
                (&child_rec.early_closes, &parent_rec.early_closes)
            {
                for date in child.keys().filter(|d| parent.contains_key(d)) {
                    timed_overlaps.push((TimedCollection::EarlyCloses, *date));
                }
            }
            if let (Some(child), Some(parent)) = (&child_rec.late_opens, &parent_rec.late_opens) {
                for date in child.keys().filter(|d| parent.contains_key(d)) {
                    timed_overlaps.push((TimedCollection::LateOpens, *date));
                }
            }
        }

        for (collection, date) in date_overlaps {
            if store.remove_date(&key, collection, date) {
                report.repaired += 1;
            }
            info!(
                "{}: {} already on parent {} {}; removed from child",
                key,
                date,
                parent,
                CollectionKind::from(collection)
            );
            report.issues.push(IntegrityIssue::ParentOverlap {
                key: key.clone(),
                parent: parent.clone(),
                collection: collection.into(),
                date,
            });
        }
        for (collection, date) in timed_overlaps {
            if store.remove_timed(&key, collection, date) {
                report.repaired += 1;
            }
            info!(
                "{}: {} already on parent {} {}; removed from child",
                key,
                date,
                parent,
                CollectionKind::from(collection)
            );
            report.issues.push(IntegrityIssue::ParentOverlap {
                key: key.clone(),
                parent: parent.clone(),
                collection: collection.into(),
                date,
            });
        }
    }
    report
}

/// Full consistency pass in fixed order: duplicate repair, holiday/event
/// overlap report, parent/child reconciliation.
pub fn check(store: &mut CalendarStore) -> IntegrityReport {
    let mut report = deduplicate_and_repair(store);
    report.absorb(report_holiday_overlaps(store));
    report.absorb(reconcile_with_parent(store));

    if report.is_clean() {
        info!("consistency checks clean");
    } else {
        info!(
            "consistency checks: {} issues, {} repaired, {} left for review",
            report.issues.len(),
            report.repaired,
            report.unrepaired_overlaps()
        );
    }
    report
}
