use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use mhdb_schemas::EntryKey;
use mhdb_store::{CalendarStore, DateCollection, TimedCollection};

use crate::{ChangeSet, ChangeSetError, ClassChanges, ProductKeyMap};

/// Per-class bank-holiday exclusion lists: tickers that must not receive a
/// class's bank holidays (e.g. fx excludes MNH/CNH/MIR).
pub type Exclusions = BTreeMap<String, BTreeSet<String>>;

/// Counters of what a merge actually did. No-op applications (idempotent
/// repeats, unknown entries) are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub inserted: usize,
    pub removed: usize,
}

impl MergeStats {
    fn absorb(&mut self, other: MergeStats) {
        self.inserted += other.inserted;
        self.removed += other.removed;
    }
}

/// Applies a change set to the store, fanning each class's changes out to
/// every product the key map says the class covers.
pub struct MergeEngine<'a> {
    store: &'a mut CalendarStore,
    keys: &'a ProductKeyMap,
}

impl<'a> MergeEngine<'a> {
    pub fn new(store: &'a mut CalendarStore, keys: &'a ProductKeyMap) -> Self {
        Self { store, keys }
    }

    /// Apply a whole change set: all additions for every class first, then
    /// all removals for every class. First-applied value wins for timed
    /// collections, so addition order across classes is part of the
    /// contract; removal order is not (pure deletion).
    pub fn apply_all(
        &mut self,
        changes: &ChangeSet,
        exclusions: &Exclusions,
    ) -> Result<MergeStats, ChangeSetError> {
        let empty = BTreeSet::new();
        let mut stats = MergeStats::default();

        for (class, class_changes) in changes.classes() {
            let excluded = exclusions.get(class).unwrap_or(&empty);
            stats.absorb(self.apply_additions(class, class_changes, excluded)?);
        }
        for (class, class_changes) in changes.classes() {
            stats.absorb(self.apply_removals(class, class_changes)?);
        }

        info!(
            "merge complete: {} inserted, {} removed",
            stats.inserted, stats.removed
        );
        Ok(stats)
    }

    /// Apply one class's additions to every product it covers. Tickers in
    /// `bank_holiday_exclusions` are skipped for bank holidays only.
    pub fn apply_additions(
        &mut self,
        class: &str,
        changes: &ClassChanges,
        bank_holiday_exclusions: &BTreeSet<String>,
    ) -> Result<MergeStats, ChangeSetError> {
        let keys = self.keys;
        let products = keys.keys_for(class)?;
        let mut stats = MergeStats::default();

        for product in products {
            let key = EntryKey::future(&product.ticker, &product.market);

            for instant in &changes.early_closes {
                if self
                    .store
                    .add_instant(&key, TimedCollection::EarlyCloses, *instant)
                {
                    stats.inserted += 1;
                }
            }
            for instant in &changes.late_opens {
                if self
                    .store
                    .add_instant(&key, TimedCollection::LateOpens, *instant)
                {
                    stats.inserted += 1;
                }
            }
            for date in &changes.holidays {
                if self.store.add_date(&key, DateCollection::Holidays, *date) {
                    stats.inserted += 1;
                }
            }

            if bank_holiday_exclusions.contains(&product.ticker) {
                if !changes.bank_holidays.is_empty() {
                    debug!("{} excluded from {} bank holidays", product.ticker, class);
                }
                continue;
            }
            for date in &changes.bank_holidays {
                if self
                    .store
                    .add_date(&key, DateCollection::BankHolidays, *date)
                {
                    stats.inserted += 1;
                }
            }
        }
        Ok(stats)
    }

    /// Apply one class's removals, collection by collection: early closes,
    /// late opens, holidays, bank holidays.
    pub fn apply_removals(
        &mut self,
        class: &str,
        changes: &ClassChanges,
    ) -> Result<MergeStats, ChangeSetError> {
        let keys = self.keys;
        let products = keys.keys_for(class)?;
        let mut stats = MergeStats::default();

        for product in products {
            let key = EntryKey::future(&product.ticker, &product.market);

            for date in &changes.remove.early_closes {
                if self
                    .store
                    .remove_timed(&key, TimedCollection::EarlyCloses, *date)
                {
                    stats.removed += 1;
                }
            }
            for date in &changes.remove.late_opens {
                if self
                    .store
                    .remove_timed(&key, TimedCollection::LateOpens, *date)
                {
                    stats.removed += 1;
                }
            }
            for date in &changes.remove.holidays {
                if self.store.remove_date(&key, DateCollection::Holidays, *date) {
                    stats.removed += 1;
                }
            }
            for date in &changes.remove.bank_holidays {
                if self
                    .store
                    .remove_date(&key, DateCollection::BankHolidays, *date)
                {
                    stats.removed += 1;
                }
            }
        }
        Ok(stats)
    }
}
