//! Durable local storage for client state.
//!
//! Each store is saved as one JSON document under a fixed key, wrapped in a
//! versioned envelope:
//!
//! ```json
//! { "state": { ... }, "version": 0 }
//! ```
//!
//! [`FileStorage`] keeps one file per key in the data directory and replaces
//! it atomically on every write. [`MemoryStorage`] is used in tests.
//! There is no cross-store transaction and no conflict resolution: the last
//! write to a key wins.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when reading or writing local state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key contains characters that are not safe in a file name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key/value store for serialized state documents.
pub trait StateStorage: Send + Sync {
    /// Read the document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the document stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// File Storage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StateStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename so readers never see a torn file
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-memory storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

// =============================================================================
// Persisted Store
// =============================================================================

/// State that can be persisted under a fixed storage key.
pub trait Persist: Serialize + DeserializeOwned + Default {
    /// Key the state document is stored under.
    const STORAGE_KEY: &'static str;
    /// Schema version written into the envelope.
    const VERSION: u32 = 0;
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

/// A state value mirrored to storage after every change.
///
/// Reads go through `Deref`; writes go through [`PersistedStore::update`],
/// which saves once the closure returns.
pub struct PersistedStore<T: Persist> {
    storage: Arc<dyn StateStorage>,
    state: T,
}

impl<T: Persist> PersistedStore<T> {
    /// Load the state from storage.
    ///
    /// A missing document yields the default state. A document that cannot
    /// be parsed, or was written with another schema version, is logged and
    /// replaced by the default state on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn load(storage: Arc<dyn StateStorage>) -> Result<Self, StorageError> {
        let state = match storage.get_item(T::STORAGE_KEY)? {
            None => {
                debug!(key = T::STORAGE_KEY, "No stored state, using defaults");
                T::default()
            }
            Some(raw) => match serde_json::from_str::<Envelope<T>>(&raw) {
                Ok(envelope) if envelope.version == T::VERSION => envelope.state,
                Ok(envelope) => {
                    warn!(
                        key = T::STORAGE_KEY,
                        stored = envelope.version,
                        expected = T::VERSION,
                        "Stored state has a different version, using defaults"
                    );
                    T::default()
                }
                Err(e) => {
                    warn!(
                        key = T::STORAGE_KEY,
                        error = %e,
                        "Stored state is corrupt, using defaults"
                    );
                    T::default()
                }
            },
        };

        Ok(Self { storage, state })
    }

    /// Wrap an in-memory state without reading storage.
    pub fn with_state(storage: Arc<dyn StateStorage>, state: T) -> Self {
        Self { storage, state }
    }

    /// Current state.
    pub const fn state(&self) -> &T {
        &self.state
    }

    /// Mutable access for transient fields. Nothing is saved until the next
    /// [`PersistedStore::update`] or [`PersistedStore::save`].
    pub const fn state_mut(&mut self) -> &mut T {
        &mut self.state
    }

    /// Apply a change and save the result.
    ///
    /// The in-memory state keeps the change even if saving fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R, StorageError> {
        let result = f(&mut self.state);
        self.save()?;
        Ok(result)
    }

    /// Write the current state to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or written.
    pub fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&EnvelopeRef {
            state: &self.state,
            version: T::VERSION,
        })?;
        self.storage.set_item(T::STORAGE_KEY, &json)
    }

    /// Reset to the default state and save it.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.update(|state| *state = T::default())
    }
}

impl<T: Persist> Deref for PersistedStore<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.state
    }
}

impl<T: Persist + std::fmt::Debug> std::fmt::Debug for PersistedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("key", &T::STORAGE_KEY)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
