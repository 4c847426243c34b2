//! Persistence for the diary.
//!
//! Values live in a small key-value store; the entry sequence is kept as a
//! single JSON document under [`ENTRIES_KEY`]. Storage problems are logged
//! here and never reach the caller: a failed read looks like an empty diary
//! and a failed write is a no-op.

use crate::diary_entry::DiaryEntry;
use crate::error::DiaryError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, error, warn};

pub const ENTRIES_KEY: &str = "emotion_diary_entries";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DiaryError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DiaryError>;
    fn remove(&self, key: &str) -> Result<(), DiaryError>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, DiaryError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DiaryError> {
        fs::create_dir_all(&self.dir)?;
        // write then rename so a reader never sees half a document
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DiaryError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DiaryError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DiaryError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DiaryError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, DiaryError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DiaryError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), DiaryError> {
        (**self).remove(key)
    }
}

/// Reads and writes the entry sequence as a whole.
pub struct EntryStore<S> {
    kv: S,
}

impl<S: KeyValueStore> EntryStore<S> {
    pub fn new(kv: S) -> Self {
        EntryStore { kv }
    }

    pub fn load(&self) -> Vec<DiaryEntry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Failed to load diary entries");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<DiaryEntry>, DiaryError> {
        let Some(stored) = self.kv.get(ENTRIES_KEY)? else {
            debug!("No stored diary entries");
            return Ok(Vec::new());
        };
        let entries: Vec<DiaryEntry> = serde_json::from_str(&stored)?;
        debug!(count = entries.len(), "Loaded diary entries");
        Ok(entries)
    }

    pub fn save(&self, entries: &[DiaryEntry]) {
        let result = serde_json::to_string(entries)
            .map_err(DiaryError::from)
            .and_then(|serialized| self.kv.set(ENTRIES_KEY, &serialized));
        match result {
            Ok(()) => debug!(count = entries.len(), "Saved diary entries"),
            Err(e) => error!(error = %e, "Failed to save diary entries"),
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.kv.remove(ENTRIES_KEY) {
            error!(error = %e, "Failed to clear diary entries");
        }
    }

    /// Pretty-printed copy of everything stored, for backups.
    pub fn export(&self) -> String {
        let entries = self.load();
        serde_json::to_string_pretty(&entries).unwrap_or_else(|e| {
            error!(error = %e, "Failed to serialize export");
            "[]".to_string()
        })
    }

    /// Replaces the stored entries with a backup. Returns false, leaving the
    /// store untouched, unless the payload is a JSON array of entries.
    pub fn import(&self, json: &str) -> bool {
        let value: serde_json::Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Import payload is not valid JSON");
                return false;
            }
        };
        if !value.is_array() {
            warn!("Import payload is not a list of entries");
            return false;
        }
        let entries: Vec<DiaryEntry> = match serde_json::from_value(value) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Import payload contains malformed entries");
                return false;
            }
        };

        let serialized = match serde_json::to_string(&entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!(error = %e, "Failed to serialize imported entries");
                return false;
            }
        };
        match self.kv.set(ENTRIES_KEY, &serialized) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to store imported entries");
                false
            }
        }
    }
}
