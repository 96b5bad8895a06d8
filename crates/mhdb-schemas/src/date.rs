use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::SchemaError;

/// Textual form used everywhere in the database: month/day/year without
/// zero padding (`1/1/2024`, `12/25/2024`). Parsing accepts padded input
/// (`01/01/2024`); emission is always unpadded.
const DATE_PARSE_FMT: &str = "%m/%d/%Y";
const DATE_EMIT_FMT: &str = "%-m/%-d/%Y";

const TIME_FMT: &str = "%H:%M:%S";

/// A calendar date in database textual form. Orders by calendar date, so
/// sorted containers of `MhdbDate` are chronologically ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MhdbDate(NaiveDate);

impl MhdbDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for MhdbDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for MhdbDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_EMIT_FMT))
    }
}

impl FromStr for MhdbDate {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_PARSE_FMT)
            .map(Self)
            .map_err(|_| SchemaError::InvalidDate(s.to_string()))
    }
}

/// A wall-clock time-of-day (`12:15:00`), always in the owning entry's
/// exchange timezone by the time it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MhdbTime(NaiveTime);

impl MhdbTime {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for MhdbTime {
    fn from(time: NaiveTime) -> Self {
        Self(time)
    }
}

impl fmt::Display for MhdbTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FMT))
    }
}

impl FromStr for MhdbTime {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, TIME_FMT)
            .map(Self)
            .map_err(|_| SchemaError::InvalidTime(s.to_string()))
    }
}

// Serde: both types are strings on the wire, including as JSON map keys.

impl Serialize for MhdbDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MhdbDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl de::Visitor<'_> for V {
            type Value = MhdbDate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a date string in m/d/yyyy form")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<MhdbDate, E> {
                s.parse().map_err(E::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}

impl Serialize for MhdbTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MhdbTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl de::Visitor<'_> for V {
            type Value = MhdbTime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a time string in HH:MM:SS form")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<MhdbTime, E> {
                s.parse().map_err(E::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}
