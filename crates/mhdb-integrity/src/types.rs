use serde::Serialize;

use mhdb_schemas::{EntryKey, MhdbDate};
use mhdb_store::CollectionKind;

/// One finding of a consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityIssue {
    /// A date occurred more than once in one collection. Repaired by
    /// collapsing to a single occurrence.
    DuplicateDate {
        key: EntryKey,
        collection: CollectionKind,
        date: MhdbDate,
        count: usize,
    },

    /// A date is both a full holiday and a partial-schedule event (or bank
    /// holiday) on the same entry. Reported only; a human decides.
    HolidayEventOverlap {
        key: EntryKey,
        collection: CollectionKind,
        date: MhdbDate,
    },

    /// A date present on both a child entry and its generic parent in the
    /// same collection. Repaired by dropping the child's copy.
    ParentOverlap {
        key: EntryKey,
        parent: EntryKey,
        collection: CollectionKind,
        date: MhdbDate,
    },
}

/// Outcome of one check or of the whole pass. `repaired` counts individual
/// removals performed; issues that are report-only contribute nothing to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
    pub repaired: usize,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings left for a human: holiday/event overlaps are never
    /// auto-repaired.
    pub fn unrepaired_overlaps(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, IntegrityIssue::HolidayEventOverlap { .. }))
            .count()
    }

    pub fn absorb(&mut self, other: IntegrityReport) {
        self.issues.extend(other.issues);
        self.repaired += other.repaired;
    }
}
