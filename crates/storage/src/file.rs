//! JSON file backed [`Memento`].
//!
//! Layout:
//!
//! ```json
//! {
//!   "values": { "vscode-pets.extra-pets.types": ["dog"] },
//!   "keysForSync": ["vscode-pets.extra-pets.types"]
//! }
//! ```

use crate::memento::Memento;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Failure reading or writing the state file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {path:?} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateFile {
    #[serde(default)]
    values: IndexMap<String, Value>,
    #[serde(default)]
    keys_for_sync: Vec<String>,
}

/// Global state persisted as one pretty-printed JSON file.
///
/// Every write rewrites the whole file.
#[derive(Debug)]
pub struct JsonFileMemento {
    path: PathBuf,
    state: Mutex<StateFile>,
}

impl JsonFileMemento {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StorageError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StateFile::default(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        tracing::debug!("Opened state file {:?}", path);
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Open the store, starting empty if the file is unreadable.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::open(&path).unwrap_or_else(|e| {
            tracing::warn!("{}, starting with empty state", e);
            Self {
                path,
                state: Mutex::new(StateFile::default()),
            }
        })
    }

    fn flush(&self, state: &StateFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(state).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, edit: impl FnOnce(&mut StateFile)) {
        let mut state = self.state.lock();
        edit(&mut state);
        if let Err(e) = self.flush(&state) {
            tracing::warn!("Failed to save state: {}", e);
        }
    }
}

impl Memento for JsonFileMemento {
    fn get(&self, key: &str) -> Option<Value> {
        self.state.lock().values.get(key).cloned()
    }

    fn update(&self, key: &str, value: Value) {
        self.write(|state| {
            state.values.insert(key.to_string(), value);
        });
    }

    fn set_keys_for_sync(&self, keys: &[&str]) {
        self.write(|state| {
            state.keys_for_sync = keys.iter().map(|k| k.to_string()).collect();
        });
    }

    fn keys_for_sync(&self) -> Vec<String> {
        self.state.lock().keys_for_sync.clone()
    }
}
