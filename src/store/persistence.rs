//! Versioned persistence for the skill store.
//!
//! The store state is wrapped in a `{ "version": N, "state": {...} }`
//! document and written under a fixed storage key. Older documents are
//! upgraded by [`migrate`] when loaded.

use crate::store::state::StoreState;
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Key the store persists under.
pub const STORAGE_KEY: &str = "mouse-skill-storage";

/// Current schema version of the persisted document.
pub const SCHEMA_VERSION: u32 = 1;

/// Durable key/value storage for serialized documents.
pub trait ProgressStorage: Send {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, data: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ProgressStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, data: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), data)?;
        Ok(())
    }
}

/// In-memory storage. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl ProgressStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, data: &str) -> Result<(), StoreError> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), data.to_string());
        Ok(())
    }
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    state: &'a StoreState,
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    version: u32,
    state: serde_json::Value,
}

/// Upgrade a persisted state from `version` to [`SCHEMA_VERSION`].
pub fn migrate(version: u32, state: serde_json::Value) -> Result<serde_json::Value, StoreError> {
    if version > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    // Version 0 documents predate the version field and already share the
    // version 1 layout.
    if version < SCHEMA_VERSION {
        tracing::debug!(from = version, to = SCHEMA_VERSION, "migrated skill store state");
    }
    Ok(state)
}

/// Serialize a state into the versioned document format.
pub fn encode(state: &StoreState) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&DocumentRef {
        version: SCHEMA_VERSION,
        state,
    })?)
}

/// Parse a versioned document, running migrations as needed.
pub fn decode(data: &str) -> Result<StoreState, StoreError> {
    let document: Document = serde_json::from_str(data)?;
    let state = migrate(document.version, document.state)?;
    Ok(serde_json::from_value(state)?)
}

/// Load the persisted state, if any.
pub fn load_state(
    storage: &dyn ProgressStorage,
    key: &str,
) -> Result<Option<StoreState>, StoreError> {
    storage.load(key)?.map(|data| decode(&data)).transpose()
}

pub fn save_state(
    storage: &dyn ProgressStorage,
    key: &str,
    state: &StoreState,
) -> Result<(), StoreError> {
    storage.save(key, &encode(state)?)
}
