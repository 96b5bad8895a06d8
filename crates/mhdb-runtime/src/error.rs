use std::path::PathBuf;

use thiserror::Error;

use mhdb_merge::ChangeSetError;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    ChangeSet(#[from] ChangeSetError),

    #[error("run config: {0}")]
    Config(String),
}
