use std::collections::BTreeMap;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use mhdb_schemas::{CalendarRecord, EntryKey, MhdbDate, MhdbDocument, MhdbTime};

use crate::{CollectionKind, DateCollection, TimedCollection};

/// In-memory baseline database plus every mutation the merge and the
/// consistency checks are allowed to perform.
///
/// Invariants held after every operation:
/// - no date appears twice in any collection of any entry;
/// - every collection is ascending by calendar date;
/// - `exchange_time_zone` is never written, only read.
///
/// All mutations are idempotent: applying the same logical change twice
/// leaves the same state as applying it once.
pub struct CalendarStore {
    doc: MhdbDocument,
}

impl CalendarStore {
    pub fn new(doc: MhdbDocument) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &MhdbDocument {
        &self.doc
    }

    pub fn into_document(self) -> MhdbDocument {
        self.doc
    }

    pub fn entry(&self, key: &EntryKey) -> Option<&CalendarRecord> {
        self.doc.entries.get(key)
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.doc.entries.contains_key(key)
    }

    /// Snapshot of all entry keys, for passes that mutate while iterating.
    pub fn entry_keys(&self) -> Vec<EntryKey> {
        self.doc.entries.keys().cloned().collect()
    }

    /// Insert `date` into a list collection. Returns `true` only on actual
    /// insertion. A missing entry is expected (baseline coverage lags the
    /// product universe) and is a silent skip; a date already present is a
    /// no-op. The bank-holiday list is created on first insert.
    pub fn add_date(&mut self, key: &EntryKey, collection: DateCollection, date: MhdbDate) -> bool {
        let Some(record) = self.doc.entries.get_mut(key) else {
            debug!("no baseline entry for {}; skipping", key);
            return false;
        };

        let list = match collection {
            DateCollection::Holidays => &mut record.holidays,
            DateCollection::BankHolidays => {
                if record.bank_holidays.is_none() {
                    info!("created empty bank holiday collection on {}", key);
                }
                record.bank_holidays.get_or_insert_with(Vec::new)
            }
        };

        if list.contains(&date) {
            return false;
        }
        list.push(date);
        list.sort_unstable();
        info!(
            "date {} added to {} {}",
            date,
            key,
            CollectionKind::from(collection)
        );
        true
    }

    /// Remove `date` from a list collection if present. Removal from a
    /// sorted list keeps it sorted; no re-sort needed.
    pub fn remove_date(
        &mut self,
        key: &EntryKey,
        collection: DateCollection,
        date: MhdbDate,
    ) -> bool {
        let Some(record) = self.doc.entries.get_mut(key) else {
            debug!("no baseline entry for {}; skipping", key);
            return false;
        };

        let list = match collection {
            DateCollection::Holidays => &mut record.holidays,
            DateCollection::BankHolidays => match record.bank_holidays.as_mut() {
                Some(list) => list,
                None => {
                    warn!(
                        "{} has no {} collection; nothing to remove",
                        key,
                        CollectionKind::from(collection)
                    );
                    return false;
                }
            },
        };

        match list.iter().position(|d| *d == date) {
            Some(idx) => {
                list.remove(idx);
                info!(
                    "date {} removed from {} {}",
                    date,
                    key,
                    CollectionKind::from(collection)
                );
                true
            }
            None => false,
        }
    }

    /// Insert an absolute instant into a timed collection. The instant is
    /// re-expressed as wall clock in the entry's own exchange timezone, and
    /// both the stored date and the stored time come from that conversion.
    ///
    /// First write wins: if the (converted) date is already a key, the
    /// existing time stands and the call is a no-op. A differing skipped
    /// time is surfaced at warn level so authoring conflicts are visible.
    pub fn add_instant(
        &mut self,
        key: &EntryKey,
        collection: TimedCollection,
        instant: DateTime<Tz>,
    ) -> bool {
        let Some(record) = self.doc.entries.get_mut(key) else {
            debug!("no baseline entry for {}; skipping", key);
            return false;
        };

        let local = instant.with_timezone(&record.exchange_time_zone);
        let date = MhdbDate::from(local.date_naive());
        let time = MhdbTime::from(local.time());

        let map = match collection {
            TimedCollection::EarlyCloses => &mut record.early_closes,
            TimedCollection::LateOpens => &mut record.late_opens,
        };
        if map.is_none() {
            info!(
                "created empty {} collection on {}",
                CollectionKind::from(collection),
                key
            );
        }
        let map = map.get_or_insert_with(BTreeMap::new);

        if let Some(existing) = map.get(&date) {
            if *existing != time {
                warn!(
                    "{} {} already has {} -> {}; keeping it over later {}",
                    key,
                    CollectionKind::from(collection),
                    date,
                    existing,
                    time
                );
            }
            return false;
        }

        map.insert(date, time);
        info!(
            "date {} added to {} {}",
            date,
            key,
            CollectionKind::from(collection)
        );
        true
    }

    /// Remove the date-keyed entry from a timed collection if present.
    pub fn remove_timed(
        &mut self,
        key: &EntryKey,
        collection: TimedCollection,
        date: MhdbDate,
    ) -> bool {
        let Some(record) = self.doc.entries.get_mut(key) else {
            debug!("no baseline entry for {}; skipping", key);
            return false;
        };

        let map = match collection {
            TimedCollection::EarlyCloses => record.early_closes.as_mut(),
            TimedCollection::LateOpens => record.late_opens.as_mut(),
        };
        let Some(map) = map else {
            warn!(
                "{} has no {} collection; nothing to remove",
                key,
                CollectionKind::from(collection)
            );
            return false;
        };

        if map.remove(&date).is_some() {
            info!(
                "date {} removed from {} {}",
                date,
                key,
                CollectionKind::from(collection)
            );
            true
        } else {
            false
        }
    }

    /// Collapse duplicate dates in a list collection. The baseline itself
    /// can carry duplicates; the insert path cannot create them. Returns
    /// each duplicated date with its occurrence count (always >= 2). Also
    /// restores ascending order if the baseline was unsorted.
    pub fn dedup_collection(
        &mut self,
        key: &EntryKey,
        collection: DateCollection,
    ) -> Vec<(MhdbDate, usize)> {
        let Some(record) = self.doc.entries.get_mut(key) else {
            return Vec::new();
        };
        let list = match collection {
            DateCollection::Holidays => &mut record.holidays,
            DateCollection::BankHolidays => match record.bank_holidays.as_mut() {
                Some(list) => list,
                None => return Vec::new(),
            },
        };

        let mut counts: BTreeMap<MhdbDate, usize> = BTreeMap::new();
        for date in list.iter() {
            *counts.entry(*date).or_insert(0) += 1;
        }
        let duplicates: Vec<(MhdbDate, usize)> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .collect();

        list.sort_unstable();
        list.dedup();
        duplicates
    }

    /// Give every entry an empty `bankHolidays` list if it has none.
    /// Returns the number of collections created.
    pub fn ensure_bank_holiday_collections(&mut self) -> usize {
        let mut created = 0;
        for (key, record) in self.doc.entries.iter_mut() {
            if record.bank_holidays.is_none() {
                record.bank_holidays = Some(Vec::new());
                debug!("created empty bank holiday collection on {}", key);
                created += 1;
            }
        }
        created
    }
}
