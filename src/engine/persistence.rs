//! Persistence of table preferences
//!
//! A [`PreferenceStore`] is a plain key-value blob store. The
//! [`PersistenceAdapter`] sits on top of it and never lets a storage failure
//! reach the table: loads fail open to "no snapshot" and failed saves are
//! logged and dropped.

use super::comparator::SortOrder;
use super::filter::ActiveFilters;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Durable subset of the table view state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub order: SortOrder,
    pub order_by: String,
    pub rows_per_page: usize,
    #[serde(default)]
    pub filters: ActiveFilters,
    #[serde(default)]
    pub hidden_columns: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value storage for preference blobs
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn write(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store. Clones share the same map, so a handle kept by the
/// caller sees what table instances wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn insert(&self, key: &str, blob: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), blob.to_string());
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File store
// ─────────────────────────────────────────────────────────────────────────────

/// One JSON file per key inside a directory. File names hex-encode the key,
/// so keys differing only in case or punctuation never share a file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(key)))
    }
}

impl PreferenceStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        fs::write(self.path_for(key), blob)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────────────────────────────────────

/// Loads and saves snapshots under the caller's persist key.
///
/// Without a key, or without a store, both directions are no-ops.
pub struct PersistenceAdapter {
    key: Option<String>,
    store: Option<Box<dyn PreferenceStore>>,
}

impl PersistenceAdapter {
    pub fn new(key: Option<String>, store: Option<Box<dyn PreferenceStore>>) -> Self {
        let key = key.filter(|k| !k.is_empty());
        Self { key, store }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some() && self.store.is_some()
    }

    pub fn load(&self) -> Option<PersistedSnapshot> {
        let key = self.key.as_deref()?;
        let store = self.store.as_ref()?;

        let blob = match store.read(key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read table preferences '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<PersistedSnapshot>(&blob) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Ignoring malformed table preferences '{}': {}", key, e);
                None
            }
        }
    }

    /// Write the whole snapshot. Failures are swallowed.
    pub fn save(&mut self, snapshot: &PersistedSnapshot) {
        let (Some(key), Some(store)) = (self.key.as_deref(), self.store.as_mut()) else {
            return;
        };

        let result = serde_json::to_string_pretty(snapshot)
            .map_err(PersistenceError::from)
            .and_then(|blob| store.write(key, &blob));

        match result {
            Ok(()) => debug!("Saved table preferences '{}'", key),
            Err(e) => warn!("Failed to save table preferences '{}': {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::value::Value;

    fn snapshot() -> PersistedSnapshot {
        PersistedSnapshot {
            order: SortOrder::Desc,
            order_by: "name".to_string(),
            rows_per_page: 25,
            filters: ActiveFilters::from([("status".to_string(), Value::from("active"))]),
            hidden_columns: vec!["notes".to_string()],
        }
    }

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn read(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Err(PersistenceError::Unavailable("quota exceeded".to_string()))
        }

        fn write(&mut self, _key: &str, _blob: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut adapter =
            PersistenceAdapter::new(Some("jobs".to_string()), Some(Box::new(store.clone())));

        assert_eq!(adapter.load(), None);
        adapter.save(&snapshot());
        assert_eq!(adapter.load(), Some(snapshot()));
        assert!(store.get("jobs").is_some());
    }

    #[test]
    fn test_snapshot_layout() {
        let json: serde_json::Value = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["order"], "desc");
        assert_eq!(json["orderBy"], "name");
        assert_eq!(json["rowsPerPage"], 25);
        assert_eq!(json["filters"]["status"], "active");
        assert_eq!(json["hiddenColumns"][0], "notes");
    }

    #[test]
    fn test_malformed_content_loads_as_none() {
        let store = MemoryStore::new();
        store.insert("jobs", "{ not json");
        let adapter = PersistenceAdapter::new(Some("jobs".to_string()), Some(Box::new(store)));
        assert_eq!(adapter.load(), None);
    }

    #[test]
    fn test_storage_errors_are_swallowed() {
        let mut adapter =
            PersistenceAdapter::new(Some("jobs".to_string()), Some(Box::new(FailingStore)));
        assert_eq!(adapter.load(), None);
        adapter.save(&snapshot());
    }

    #[test]
    fn test_no_key_is_noop() {
        let store = MemoryStore::new();
        let mut adapter = PersistenceAdapter::new(None, Some(Box::new(store.clone())));
        adapter.save(&snapshot());
        assert_eq!(adapter.load(), None);
        assert!(!adapter.is_enabled());
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("gridline-prefs-{}", std::process::id()));
        let mut store = FileStore::new(&dir);

        assert!(store.read("Jobs Table").unwrap().is_none());
        store.write("Jobs Table", "{}").unwrap();
        assert_eq!(store.read("Jobs Table").unwrap().as_deref(), Some("{}"));
        assert!(dir.join("4a6f6273205461626c65.json").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_keys_differing_in_case_or_punctuation_are_separate() {
        let dir = std::env::temp_dir().join(format!("gridline-prefs-keys-{}", std::process::id()));
        let mut store = FileStore::new(&dir);

        store.write("Jobs", "upper").unwrap();
        store.write("a/b", "slash").unwrap();
        assert!(store.read("jobs").unwrap().is_none());
        assert!(store.read("jobs!").unwrap().is_none());
        assert!(store.read("a_b").unwrap().is_none());
        assert_eq!(store.read("Jobs").unwrap().as_deref(), Some("upper"));
        assert_eq!(store.read("a/b").unwrap().as_deref(), Some("slash"));

        let _ = fs::remove_dir_all(&dir);
    }
}
