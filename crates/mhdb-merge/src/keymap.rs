use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use mhdb_schemas::{EntryKey, MhdbDocument, SecurityType};

use crate::ChangeSetError;

/// Markets whose futures entries this tool maintains. Used only by the
/// unmapped-entry report; the merge itself is driven by the key map.
pub const CME_MARKETS: &[&str] = &["cme", "cbot", "nymex", "comex"];

/// One product covered by a class: ticker plus the market it is listed on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProductKey {
    pub ticker: String,
    pub market: String,
}

/// Static mapping from product class ("equity", "energy", "fx", ...) to the
/// products it covers. Loaded once from a pre-computed JSON document of the
/// shape `{class: {"cmeKeys": {ticker: market, ...}}}`; read-only afterward.
/// Per-class fields other than `cmeKeys` are ignored.
#[derive(Debug, Clone, Default)]
pub struct ProductKeyMap {
    classes: BTreeMap<String, Vec<ProductKey>>,
}

#[derive(Deserialize)]
struct RawClass {
    #[serde(default, rename = "cmeKeys")]
    cme_keys: BTreeMap<String, String>,
}

impl ProductKeyMap {
    pub fn from_json_str(s: &str) -> Result<Self, ChangeSetError> {
        let raw: BTreeMap<String, RawClass> = serde_json::from_str(s)?;
        let classes = raw
            .into_iter()
            .map(|(class, raw)| {
                // BTreeMap iteration makes per-class product order
                // deterministic (sorted by ticker).
                let products = raw
                    .cme_keys
                    .into_iter()
                    .map(|(ticker, market)| ProductKey { ticker, market })
                    .collect();
                (class, products)
            })
            .collect();
        Ok(Self { classes })
    }

    /// Products covered by `class`. An unknown class is a config error.
    pub fn keys_for(&self, class: &str) -> Result<&[ProductKey], ChangeSetError> {
        self.classes
            .get(class)
            .map(Vec::as_slice)
            .ok_or_else(|| ChangeSetError::UnknownClass(class.to_string()))
    }

    pub fn contains_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// True if any class covers this ticker/market pair.
    pub fn covers(&self, ticker: &str, market: &str) -> bool {
        self.classes
            .values()
            .flatten()
            .any(|p| p.ticker == ticker && p.market == market)
    }
}

/// Report futures entries on CME-group markets that no product class
/// covers — candidates for key-map maintenance. Report only, no repair.
pub fn report_unmapped_entries(doc: &MhdbDocument, map: &ProductKeyMap) -> Vec<EntryKey> {
    let mut unmapped = Vec::new();
    for key in doc.entries.keys() {
        if key.security != SecurityType::Future || key.is_generic() {
            continue;
        }
        if !CME_MARKETS.contains(&key.market.as_str()) {
            continue;
        }
        if !map.covers(&key.ticker, &key.market) {
            warn!("product {} on {} is not covered by any class", key.ticker, key.market);
            unmapped.push(key.clone());
        }
    }
    unmapped
}
