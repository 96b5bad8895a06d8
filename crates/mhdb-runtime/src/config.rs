use std::path::Path;

use serde::Deserialize;

use mhdb_merge::{Exclusions, ProductKeyMap};

use crate::RuntimeError;

/// Per-run configuration, read from a JSON file. Everything defaults off so
/// an absent config file means "merge with no exclusions".
///
/// ```json
/// {
///   "bankHolidayExclusions": { "fx": ["MNH", "CNH", "MIR"] },
///   "ensureBankHolidayCollections": false,
///   "reportUnmappedEntries": true
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunConfig {
    /// Tickers to skip when a class's bank holidays are propagated.
    #[serde(default)]
    pub bank_holiday_exclusions: Exclusions,

    /// Give every entry an empty `bankHolidays` list if it has none.
    #[serde(default)]
    pub ensure_bank_holiday_collections: bool,

    /// Warn about CME-market entries no product class covers.
    #[serde(default)]
    pub report_unmapped_entries: bool,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, RuntimeError> {
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| RuntimeError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An exclusion list naming a class the key map does not carry is a
    /// config mistake; fail before touching the database.
    pub fn validate(&self, keys: &ProductKeyMap) -> Result<(), RuntimeError> {
        for class in self.bank_holiday_exclusions.keys() {
            if !keys.contains_class(class) {
                return Err(RuntimeError::Config(format!(
                    "bankHolidayExclusions names unknown class `{class}`"
                )));
            }
        }
        Ok(())
    }
}
