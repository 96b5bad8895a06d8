use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::SchemaError;

/// Ticker used by generic (parent) entries that hold exceptions common to a
/// whole product class.
pub const GENERIC_TICKER: &str = "[*]";

/// Instrument kind component of an entry key. This tool only ever writes
/// `Future` entries, but the baseline database carries every kind and all of
/// them must survive a load -> save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecurityType {
    Base,
    Equity,
    Option,
    Commodity,
    Forex,
    Future,
    Cfd,
    Crypto,
    CryptoFuture,
    Index,
    IndexOption,
    FutureOption,
}

impl SecurityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityType::Base => "Base",
            SecurityType::Equity => "Equity",
            SecurityType::Option => "Option",
            SecurityType::Commodity => "Commodity",
            SecurityType::Forex => "Forex",
            SecurityType::Future => "Future",
            SecurityType::Cfd => "Cfd",
            SecurityType::Crypto => "Crypto",
            SecurityType::CryptoFuture => "CryptoFuture",
            SecurityType::Index => "Index",
            SecurityType::IndexOption => "IndexOption",
            SecurityType::FutureOption => "FutureOption",
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Base" => SecurityType::Base,
            "Equity" => SecurityType::Equity,
            "Option" => SecurityType::Option,
            "Commodity" => SecurityType::Commodity,
            "Forex" => SecurityType::Forex,
            "Future" => SecurityType::Future,
            "Cfd" => SecurityType::Cfd,
            "Crypto" => SecurityType::Crypto,
            "CryptoFuture" => SecurityType::CryptoFuture,
            "Index" => SecurityType::Index,
            "IndexOption" => SecurityType::IndexOption,
            "FutureOption" => SecurityType::FutureOption,
            other => return Err(SchemaError::UnknownSecurityType(other.to_string())),
        })
    }
}

/// Identifier of one calendar record: `{security}-{market}-{ticker}`,
/// e.g. `Future-cme-ES`. The generic (parent) form replaces the ticker with
/// `[*]`: `Future-cme-[*]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryKey {
    pub security: SecurityType,
    pub market: String,
    pub ticker: String,
}

impl EntryKey {
    pub fn new(
        security: SecurityType,
        market: impl Into<String>,
        ticker: impl Into<String>,
    ) -> Self {
        Self {
            security,
            market: market.into(),
            ticker: ticker.into(),
        }
    }

    /// Key of a futures product, the only kind the merge engine writes.
    pub fn future(ticker: impl Into<String>, market: impl Into<String>) -> Self {
        Self::new(SecurityType::Future, market, ticker)
    }

    pub fn is_generic(&self) -> bool {
        self.ticker == GENERIC_TICKER
    }

    /// The generic (parent) key for this entry's market and security type.
    pub fn generic(&self) -> EntryKey {
        EntryKey::new(self.security, self.market.clone(), GENERIC_TICKER)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.security, self.market, self.ticker)
    }
}

impl FromStr for EntryKey {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(security), Some(market), Some(ticker)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SchemaError::InvalidKey(s.to_string()));
        };
        if market.is_empty() || ticker.is_empty() {
            return Err(SchemaError::InvalidKey(s.to_string()));
        }
        Ok(EntryKey::new(security.parse()?, market, ticker))
    }
}

impl Serialize for EntryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl de::Visitor<'_> for V {
            type Value = EntryKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an entry key of the form security-market-ticker")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<EntryKey, E> {
                s.parse().map_err(E::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}
