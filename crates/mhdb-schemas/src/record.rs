use std::collections::BTreeMap;

use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EntryKey, MhdbDate, MhdbTime};

/// One entry's calendar record: exchange timezone plus the four exception
/// collections this tool manages.
///
/// - `holidays` is always present (possibly empty).
/// - `bank_holidays`, `early_closes` and `late_opens` are optional: `None`
///   means the entry does not track that collection; the store creates it
///   on first insert.
/// - Timed collections are `BTreeMap<MhdbDate, _>`, so iteration (and
///   therefore serialization) is ascending by date by construction.
/// - `extra` carries every field this tool does not manage (`dataTimeZone`,
///   the weekly session tables, ...) so they survive load -> merge -> save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRecord {
    /// IANA zone stored times are expressed in. Read-only for the merge.
    pub exchange_time_zone: Tz,

    #[serde(default)]
    pub holidays: Vec<MhdbDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_holidays: Option<Vec<MhdbDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_closes: Option<BTreeMap<MhdbDate, MhdbTime>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_opens: Option<BTreeMap<MhdbDate, MhdbTime>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CalendarRecord {
    /// A record with no exceptions, used by tests and fixtures.
    pub fn empty(exchange_time_zone: Tz) -> Self {
        Self {
            exchange_time_zone,
            holidays: Vec::new(),
            bank_holidays: None,
            early_closes: None,
            late_opens: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// The whole database document. `IndexMap` keeps the baseline's entry order
/// on output; the diff of a run should touch dates, not shuffle entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MhdbDocument {
    pub entries: IndexMap<EntryKey, CalendarRecord>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
