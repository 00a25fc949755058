//! Local preference storage.
//!
//! Defines a small key-value interface for device-local persistence with a
//! JSON-file implementation for real use and an in-memory one for tests and
//! demo mode. Values are strings; structured values are stored as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys used across Movos.
pub mod keys {
    /// ISO-8601 timestamp of the previous home load
    pub const LAST_VISIT: &str = "MOVOS_LAST_VISIT";
    /// Recently viewed titles, most recent first
    pub const RECENTLY_VIEWED: &str = "MOVOS_RECENT";
    /// Submitted search queries, most recent first
    pub const SEARCH_HISTORY: &str = "MOVOS_SEARCH_HISTORY";
    /// Signed-in user profile
    pub const SESSION_USER: &str = "MOVOS_USER";
    /// Simulated account table
    pub const ACCOUNTS: &str = "MOVOS_ACCOUNTS";
    /// Saved titles
    pub const SAVED: &str = "MOVOS_SAVED";
    /// Notification and display preferences
    pub const PREFERENCES: &str = "MOVOS_PREFERENCES";
}

/// Key-value persistence for session and history data.
///
/// Implementations must be safe to share between the components of one
/// session. Writes are expected to be durable once `set` returns.
pub trait PreferenceStore: Send + Sync + std::fmt::Debug {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the backing file could not be read
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the backing file could not be written
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the backing file could not be written
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors that occur during preference storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt value for key '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Failed to encode value for key '{key}': {reason}")]
    Encode { key: String, reason: String },
}

/// Reads and decodes a JSON value stored under `key`.
///
/// # Errors
///
/// - `StorageError::Io` - If the store could not be read
/// - `StorageError::Corrupt` - If the stored value is not valid JSON for `T`
pub fn load_json<T: DeserializeOwned>(
    store: &dyn PreferenceStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// - `StorageError::Encode` - If the value cannot be serialized
/// - `StorageError::Io` - If the store could not be written
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn PreferenceStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

/// In-memory store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// File-backed store keeping every key in one JSON object.
///
/// The whole map is cached in memory and rewritten through a temporary file
/// on every mutation, so a crash mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file is
    /// logged and replaced by an empty store on the next write.
    ///
    /// # Errors
    ///
    /// - `StorageError::Io` - If the parent directory cannot be created
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::error!(path = %path.display(), error = %e, "Preference file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened preference store");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(values).map_err(|e| StorageError::Encode {
            key: "*".to_string(),
            reason: e.to_string(),
        })?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, raw).map_err(|source| StorageError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock();
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}
