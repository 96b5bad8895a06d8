//! mhdb-merge
//!
//! Change-set parsing and the merge engine.
//!
//! Architectural decisions:
//! - One parameterized engine driven by the product key map, not one
//!   hand-written pass per product class.
//! - Every early-close/late-open change is resolved to an absolute instant
//!   in its class's authoring zone at parse time; the store re-expresses it
//!   in each target entry's own exchange zone. Full zoned conversion,
//!   never a fixed offset.
//! - All additions for every class are applied before any removal.
//! - Unknown product class is a config error and fatal; unknown product
//!   (no baseline entry) is expected and skipped.

mod changeset;
mod engine;
mod error;
mod keymap;

pub use changeset::{ChangeSet, ClassChanges, RemovalChanges};
pub use engine::{Exclusions, MergeEngine, MergeStats};
pub use error::ChangeSetError;
pub use keymap::{report_unmapped_entries, ProductKey, ProductKeyMap, CME_MARKETS};
