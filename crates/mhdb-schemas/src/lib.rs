//! mhdb-schemas
//!
//! Data model for the market-hours exception database.
//!
//! Architectural decisions:
//! - Dates and wall-clock times are newtypes over chrono values that parse
//!   and re-emit the database's textual formats (`m/d/yyyy`, `HH:MM:SS`).
//! - Entry keys are typed (`security-market-ticker`), not raw strings.
//! - Calendar records carry the four exception collections as named, typed
//!   fields; everything this tool does not manage (session tables,
//!   `dataTimeZone`, ...) rides along in a flattened map so a load -> save
//!   cycle never drops it.
//! - Malformed date/time/zone text is a hard error. No partial parses.

mod date;
mod error;
mod key;
mod record;

pub use date::{MhdbDate, MhdbTime};
pub use error::SchemaError;
pub use key::{EntryKey, SecurityType, GENERIC_TICKER};
pub use record::{CalendarRecord, MhdbDocument};
