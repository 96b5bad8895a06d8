//! mhdb-store
//!
//! In-memory calendar store for the market-hours exception database.
//!
//! Architectural decisions:
//! - The store owns every mutation; callers never touch collections
//!   directly, so the ordering and no-duplicate invariants live in one
//!   place.
//! - Every mutation is idempotent. First write wins for timed collections.
//! - A change targeting an entry the baseline does not carry is skipped,
//!   not an error.
//! - Observable side effect of an actual insertion/removal is a tracing
//!   event; the store does no IO.

mod collection;
mod store;

pub use collection::{CollectionKind, DateCollection, TimedCollection};
pub use store::CalendarStore;
