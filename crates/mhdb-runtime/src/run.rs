use serde::Serialize;
use tracing::info;

use mhdb_integrity::{check, IntegrityReport};
use mhdb_merge::{report_unmapped_entries, MergeEngine, MergeStats};
use mhdb_store::CalendarStore;

use crate::{ChangeSetSource, DatabaseSink, DatabaseSource, RunConfig, RuntimeError};

/// What one run did, for the CLI summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub merge: MergeStats,
    pub integrity: IntegrityReport,
    pub unmapped_entries: usize,
}

/// One full maintenance run: load, merge (all additions, then all
/// removals), consistency checks, supplemental passes, write. Nothing is
/// written unless every prior stage succeeded.
pub fn run(
    source: &dyn DatabaseSource,
    changes: &dyn ChangeSetSource,
    sink: &dyn DatabaseSink,
    config: &RunConfig,
) -> Result<RunReport, RuntimeError> {
    let keys = source.load_product_keys()?;
    config.validate(&keys)?;
    let change_set = changes.load_change_set()?;

    let mut store = CalendarStore::new(source.load_database()?);

    let merge = MergeEngine::new(&mut store, &keys)
        .apply_all(&change_set, &config.bank_holiday_exclusions)?;

    let integrity = check(&mut store);

    if config.ensure_bank_holiday_collections {
        let created = store.ensure_bank_holiday_collections();
        info!("ensured bank holiday collections ({} created)", created);
    }

    let unmapped_entries = if config.report_unmapped_entries {
        report_unmapped_entries(store.document(), &keys).len()
    } else {
        0
    };

    sink.write_database(store.document())?;
    Ok(RunReport {
        merge,
        integrity,
        unmapped_entries,
    })
}

/// Consistency checks only: loads the database, runs the full check pass in
/// memory and discards any repairs. Nothing is written.
pub fn check_only(source: &dyn DatabaseSource) -> Result<IntegrityReport, RuntimeError> {
    let keys = source.load_product_keys()?;
    let mut store = CalendarStore::new(source.load_database()?);
    let report = check(&mut store);
    report_unmapped_entries(store.document(), &keys);
    Ok(report)
}
