use std::path::{Path, PathBuf};

use tracing::info;

use mhdb_merge::{ChangeSet, ProductKeyMap};
use mhdb_schemas::MhdbDocument;

use crate::RuntimeError;

/// Provides the baseline database and the product key map.
pub trait DatabaseSource {
    fn load_database(&self) -> Result<MhdbDocument, RuntimeError>;
    fn load_product_keys(&self) -> Result<ProductKeyMap, RuntimeError>;
}

/// Provides the parsed change set for one run.
pub trait ChangeSetSource {
    fn load_change_set(&self) -> Result<ChangeSet, RuntimeError>;
}

/// Receives the fully merged, fully checked database. Written exactly once
/// per successful run.
pub trait DatabaseSink {
    fn write_database(&self, doc: &MhdbDocument) -> Result<(), RuntimeError>;
}

fn read(path: &Path) -> Result<String, RuntimeError> {
    std::fs::read_to_string(path).map_err(|source| RuntimeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Baseline database + product key map as two JSON files on disk.
pub struct FileDatabaseSource {
    pub database_path: PathBuf,
    pub products_path: PathBuf,
}

impl DatabaseSource for FileDatabaseSource {
    fn load_database(&self) -> Result<MhdbDocument, RuntimeError> {
        let doc: MhdbDocument =
            serde_json::from_str(&read(&self.database_path)?).map_err(|source| {
                RuntimeError::Parse {
                    path: self.database_path.clone(),
                    source,
                }
            })?;
        info!(
            "loaded {} entries from {}",
            doc.entries.len(),
            self.database_path.display()
        );
        Ok(doc)
    }

    fn load_product_keys(&self) -> Result<ProductKeyMap, RuntimeError> {
        let map = ProductKeyMap::from_json_str(&read(&self.products_path)?)?;
        info!(
            "loaded product key map with {} classes from {}",
            map.classes().count(),
            self.products_path.display()
        );
        Ok(map)
    }
}

pub struct FileChangeSetSource {
    pub path: PathBuf,
}

impl ChangeSetSource for FileChangeSetSource {
    fn load_change_set(&self) -> Result<ChangeSet, RuntimeError> {
        let changes = ChangeSet::from_json_str(&read(&self.path)?)?;
        Ok(changes)
    }
}

/// Writes the merged database as pretty-printed JSON (2-space indent) with
/// a trailing newline.
pub struct FileDatabaseSink {
    pub path: PathBuf,
}

impl DatabaseSink for FileDatabaseSink {
    fn write_database(&self, doc: &MhdbDocument) -> Result<(), RuntimeError> {
        let mut text =
            serde_json::to_string_pretty(doc).map_err(|source| RuntimeError::Parse {
                path: self.path.clone(),
                source,
            })?;
        text.push('\n');
        std::fs::write(&self.path, text).map_err(|source| RuntimeError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(
            "wrote {} entries to {}",
            doc.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
