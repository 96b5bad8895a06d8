use serde::Serialize;

/// The two list-shaped collections (plain dates, no time-of-day).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCollection {
    Holidays,
    BankHolidays,
}

/// The two map-shaped collections (date -> wall-clock time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedCollection {
    EarlyCloses,
    LateOpens,
}

/// Unified label over all four collections, used in reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    Holidays,
    BankHolidays,
    EarlyCloses,
    LateOpens,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Holidays => "holidays",
            CollectionKind::BankHolidays => "bank holidays",
            CollectionKind::EarlyCloses => "early closes",
            CollectionKind::LateOpens => "late opens",
        }
    }
}

impl From<DateCollection> for CollectionKind {
    fn from(c: DateCollection) -> Self {
        match c {
            DateCollection::Holidays => CollectionKind::Holidays,
            DateCollection::BankHolidays => CollectionKind::BankHolidays,
        }
    }
}

impl From<TimedCollection> for CollectionKind {
    fn from(c: TimedCollection) -> Self {
        match c {
            TimedCollection::EarlyCloses => CollectionKind::EarlyCloses,
            TimedCollection::LateOpens => CollectionKind::LateOpens,
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
