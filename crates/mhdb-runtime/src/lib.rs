//! mhdb-runtime
//!
//! Run orchestration and the collaborator seams.
//!
//! Architectural decisions:
//! - The core consumes a `DatabaseSource`, a `ChangeSetSource` and a
//!   `DatabaseSink`; file handling lives in the trait implementations so
//!   the merge/check pipeline is testable without touching disk.
//! - Stage order is fixed: load -> all additions -> all removals ->
//!   consistency checks -> optional supplemental passes -> write.
//! - A failure at any stage aborts before the sink is written. The output
//!   file either holds the fully merged, fully checked database or is not
//!   produced at all.

mod config;
mod error;
mod run;
mod sources;

pub use config::RunConfig;
pub use error::RuntimeError;
pub use run::{check_only, run, RunReport};
pub use sources::{
    ChangeSetSource, DatabaseSink, DatabaseSource, FileChangeSetSource, FileDatabaseSink,
    FileDatabaseSource,
};
