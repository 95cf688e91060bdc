//! Key-value persistence for the habit and badge collections.

use crate::errors::StoreError;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::{env, fs, io, path::Path, path::PathBuf};
use tracing::error;

pub const HABITS_KEY: &str = "habits";
pub const BADGES_KEY: &str = "badges";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        // readers never observe a partially written file
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, value).map_err(write_err)?;
        fs::rename(&staging, &target).map_err(write_err)?;
        Ok(())
    }
}

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from("data")
}

/// Reads and decodes `key`, falling back to `fallback()` when the value is
/// missing or unreadable.
pub fn load_collection<S, T>(store: &S, key: &str, fallback: impl FnOnce() -> T) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match store.get(key) {
        Ok(Some(payload)) => match serde_json::from_str(&payload) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse stored `{key}`: {err}");
                fallback()
            }
        },
        Ok(None) => fallback(),
        Err(err) => {
            error!("{err}");
            fallback()
        }
    }
}

pub fn encode_collection<T: Serialize>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get(HABITS_KEY).unwrap(), None);

        store.set(HABITS_KEY, "[]".to_string()).unwrap();
        assert_eq!(store.get(HABITS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(store.dir().join("habits.json").exists());
        assert!(!store.dir().join("habits.json.tmp").exists());
    }

    #[test]
    fn corrupt_payload_uses_fallback() {
        let mut store = MemoryStore::new();
        store.set(HABITS_KEY, "{not json".to_string()).unwrap();
        let loaded: Vec<u32> = load_collection(&store, HABITS_KEY, || vec![7]);
        assert_eq!(loaded, vec![7]);
    }

    #[test]
    fn missing_key_uses_fallback() {
        let store = MemoryStore::new();
        let loaded: Vec<u32> = load_collection(&store, BADGES_KEY, Vec::new);
        assert!(loaded.is_empty());
    }

    #[test]
    fn unreadable_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be makes the read fail
        std::fs::create_dir_all(dir.path().join("badges.json")).unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.get(BADGES_KEY).is_err());
        let loaded: Vec<u32> = load_collection(&store, BADGES_KEY, || vec![1, 2]);
        assert_eq!(loaded, vec![1, 2]);
    }
}
