use chrono_tz::Tz;
use thiserror::Error;

use mhdb_schemas::{MhdbDate, MhdbTime};

#[derive(Debug, Error)]
pub enum ChangeSetError {
    /// Malformed JSON or malformed date/time/zone text anywhere in the
    /// document. Fatal: no partial merge is ever persisted.
    #[error("change document is not valid: {0}")]
    Json(#[from] serde_json::Error),

    /// A change or exclusion references a product class the key map does
    /// not carry. Config error, fatal.
    #[error("no product class `{0}` in the product key map")]
    UnknownClass(String),

    /// The authored wall-clock time falls in a DST spring-forward gap of
    /// the authoring zone and denotes no instant.
    #[error("class `{class}`: local time {date} {time} does not exist in {zone}")]
    NonexistentLocalTime {
        class: String,
        date: MhdbDate,
        time: MhdbTime,
        zone: Tz,
    },
}
