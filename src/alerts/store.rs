use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identity::AlertId;
use super::record::AlertRecord;

/// Full persisted state of the ledger: the open set and the most recent
/// resolution per identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub active_alerts: BTreeMap<AlertId, AlertRecord>,
    #[serde(default)]
    pub resolved_alerts: BTreeMap<AlertId, AlertRecord>,
}

#[derive(Debug, Error)]
pub enum LedgerStoreError {
    #[error("failed to read ledger file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid ledger file {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to write ledger file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Persistence boundary for the ledger. `save` must replace the backing
/// store atomically: readers never observe a partial write.
pub trait LedgerStore: Send {
    /// `Ok(None)` means no backing store exists yet; a malformed store is an
    /// error the caller may treat as recoverable.
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerStoreError>;
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerStoreError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<Option<LedgerSnapshot>, LedgerStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LedgerStoreError::Read {
                    path: self.path_str(),
                    source,
                });
            }
        };

        let snapshot = serde_json::from_str(&raw).map_err(|source| LedgerStoreError::Decode {
            path: self.path_str(),
            source,
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerStoreError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|source| LedgerStoreError::Write {
            path: self.path_str(),
            source,
        })?;

        // Write to a sibling temp file and rename over the target so a crash
        // mid-write never leaves a truncated ledger behind.
        let mut temp =
            tempfile::NamedTempFile::new_in(parent).map_err(|source| LedgerStoreError::Write {
                path: self.path_str(),
                source,
            })?;
        serde_json::to_writer_pretty(&mut temp, snapshot).map_err(|source| {
            LedgerStoreError::Write {
                path: self.path_str(),
                source: std::io::Error::other(source),
            }
        })?;
        temp.write_all(b"\n").map_err(|source| LedgerStoreError::Write {
            path: self.path_str(),
            source,
        })?;
        temp.persist(&self.path)
            .map_err(|error| LedgerStoreError::Write {
                path: self.path_str(),
                source: error.error,
            })?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;
