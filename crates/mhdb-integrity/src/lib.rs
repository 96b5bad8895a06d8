//! mhdb-integrity
//!
//! Consistency checks over the fully-merged calendar store.
//!
//! Architectural decisions:
//! - Duplicate dates inside one collection are repaired (collapsed to one).
//! - A date in both a child's and its generic parent's collection is
//!   redundant; the parent wins and the child's copy is removed.
//! - A date that is both a holiday and a partial-schedule event on the same
//!   entry is an authoring error a human must resolve: reported, never
//!   auto-repaired.
//! - Deterministic, pure in-memory logic. No IO beyond tracing events.

mod engine;
mod types;

pub use engine::{check, deduplicate_and_repair, reconcile_with_parent, report_holiday_overlaps};
pub use types::{IntegrityIssue, IntegrityReport};
