use std::collections::BTreeMap;

use chrono::{DateTime, LocalResult, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use mhdb_schemas::{MhdbDate, MhdbTime};

use crate::ChangeSetError;

/// Dates to delete, one list per collection. Plain dates: removal never
/// needs a time-of-day.
#[derive(Debug, Clone, Default)]
pub struct RemovalChanges {
    pub early_closes: Vec<MhdbDate>,
    pub late_opens: Vec<MhdbDate>,
    pub holidays: Vec<MhdbDate>,
    pub bank_holidays: Vec<MhdbDate>,
}

/// One class's proposed changes, with every early-close/late-open already
/// resolved to an absolute instant in the class's authoring zone.
#[derive(Debug, Clone)]
pub struct ClassChanges {
    /// Zone the change document's wall-clock times were authored in. Not
    /// necessarily any target entry's exchange zone.
    pub authoring_zone: Tz,
    pub early_closes: Vec<DateTime<Tz>>,
    pub late_opens: Vec<DateTime<Tz>>,
    pub holidays: Vec<MhdbDate>,
    pub bank_holidays: Vec<MhdbDate>,
    pub remove: RemovalChanges,
}

/// A parsed change document: per-class additions and removals. Built once
/// per run, immutable afterward.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    classes: BTreeMap<String, ClassChanges>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawRemoval {
    #[serde(default)]
    early_closes: Vec<MhdbDate>,
    #[serde(default)]
    late_opens: Vec<MhdbDate>,
    #[serde(default)]
    holidays: Vec<MhdbDate>,
    #[serde(default)]
    bank_holidays: Vec<MhdbDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClassChanges {
    exchange_time_zone: Tz,
    #[serde(default)]
    early_closes: BTreeMap<MhdbDate, MhdbTime>,
    #[serde(default)]
    late_opens: BTreeMap<MhdbDate, MhdbTime>,
    #[serde(default)]
    holidays: Vec<MhdbDate>,
    #[serde(default)]
    bank_holidays: Vec<MhdbDate>,
    #[serde(default)]
    remove: RawRemoval,
}

impl ChangeSet {
    pub fn from_json_str(s: &str) -> Result<Self, ChangeSetError> {
        let raw: BTreeMap<String, RawClassChanges> = serde_json::from_str(s)?;
        let mut classes = BTreeMap::new();
        for (class, raw) in raw {
            let zone = raw.exchange_time_zone;
            let early_closes = resolve_instants(&class, zone, &raw.early_closes)?;
            let late_opens = resolve_instants(&class, zone, &raw.late_opens)?;
            classes.insert(
                class,
                ClassChanges {
                    authoring_zone: zone,
                    early_closes,
                    late_opens,
                    holidays: raw.holidays,
                    bank_holidays: raw.bank_holidays,
                    remove: RemovalChanges {
                        early_closes: raw.remove.early_closes,
                        late_opens: raw.remove.late_opens,
                        holidays: raw.remove.holidays,
                        bank_holidays: raw.remove.bank_holidays,
                    },
                },
            );
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassChanges)> {
        self.classes.iter().map(|(c, cc)| (c.as_str(), cc))
    }

    pub fn get(&self, class: &str) -> Option<&ClassChanges> {
        self.classes.get(class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Resolve authored wall-clock date+time pairs against the authoring zone.
/// An ambiguous local time (DST fall-back) resolves to the earlier instant;
/// a nonexistent one (spring-forward gap) is fatal.
fn resolve_instants(
    class: &str,
    zone: Tz,
    dates: &BTreeMap<MhdbDate, MhdbTime>,
) -> Result<Vec<DateTime<Tz>>, ChangeSetError> {
    let mut out = Vec::with_capacity(dates.len());
    for (date, time) in dates {
        let naive = date.naive().and_time(time.naive());
        let instant = match zone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => {
                debug!(
                    "class {}: {} {} is ambiguous in {}; using earlier instant",
                    class, date, time, zone
                );
                earliest
            }
            LocalResult::None => {
                return Err(ChangeSetError::NonexistentLocalTime {
                    class: class.to_string(),
                    date: *date,
                    time: *time,
                    zone,
                })
            }
        };
        out.push(instant);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    #[test]
    fn parses_full_class_block() {
        let doc = json!({
            "equity": {
                "exchangeTimeZone": "America/Chicago",
                "earlyCloses": { "12/24/2024": "12:15:00" },
                "lateOpens": { "12/26/2024": "09:30:00" },
                "holidays": ["12/25/2024"],
                "bankHolidays": ["1/1/2025"],
                "remove": { "earlyCloses": [], "lateOpens": [], "holidays": ["7/3/2024"], "bankHolidays": [] }
            }
        });
        let set = ChangeSet::from_json_str(&doc.to_string()).unwrap();
        let cc = set.get("equity").unwrap();

        assert_eq!(cc.authoring_zone, chrono_tz::America::Chicago);
        assert_eq!(cc.early_closes.len(), 1);
        assert_eq!(cc.early_closes[0].hour(), 12);
        assert_eq!(cc.late_opens.len(), 1);
        assert_eq!(cc.holidays, vec!["12/25/2024".parse().unwrap()]);
        assert_eq!(cc.remove.holidays, vec!["7/3/2024".parse().unwrap()]);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let doc = json!({
            "fx": { "exchangeTimeZone": "America/Chicago", "holidays": ["1/1/2025"] }
        });
        let set = ChangeSet::from_json_str(&doc.to_string()).unwrap();
        let cc = set.get("fx").unwrap();
        assert!(cc.early_closes.is_empty());
        assert!(cc.bank_holidays.is_empty());
        assert!(cc.remove.holidays.is_empty());
    }

    #[test]
    fn malformed_date_text_is_fatal() {
        let doc = json!({
            "equity": { "exchangeTimeZone": "America/Chicago", "holidays": ["2024-12-25"] }
        });
        assert!(ChangeSet::from_json_str(&doc.to_string()).is_err());
    }

    #[test]
    fn unknown_zone_is_fatal() {
        let doc = json!({
            "equity": { "exchangeTimeZone": "America/Springfield", "holidays": [] }
        });
        assert!(ChangeSet::from_json_str(&doc.to_string()).is_err());
    }

    #[test]
    fn dst_gap_time_is_fatal() {
        // 2024-03-10 02:30 does not exist in America/Chicago.
        let doc = json!({
            "equity": {
                "exchangeTimeZone": "America/Chicago",
                "earlyCloses": { "3/10/2024": "02:30:00" }
            }
        });
        let err = ChangeSet::from_json_str(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ChangeSetError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn dst_ambiguous_time_takes_earlier_instant() {
        // 2024-11-03 01:30 occurs twice in America/Chicago; the earlier
        // instant is the CDT (-05:00) one.
        let doc = json!({
            "equity": {
                "exchangeTimeZone": "America/Chicago",
                "earlyCloses": { "11/3/2024": "01:30:00" }
            }
        });
        let set = ChangeSet::from_json_str(&doc.to_string()).unwrap();
        let instant = set.get("equity").unwrap().early_closes[0];
        // 01:30 CDT (-05:00) is 06:30 UTC; the later CST reading would be 07:30.
        assert_eq!(instant.naive_utc().hour(), 6);
    }
}
