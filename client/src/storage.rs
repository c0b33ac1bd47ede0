//! Persisted client storage.
//!
//! The session and user preferences survive restarts in a single JSON
//! object on disk. Every write rewrites the whole file through a temporary
//! sibling, so a crash never leaves a half-written file behind. Memory only
//! changes once the file did.
//!
//! Writes block on file I/O; async callers go through [`write_blocking`].

use catalog_core::environment::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Storage keys
pub mod keys {
    /// Display name of the signed-in user
    pub const NAME: &str = "name";
    /// Bearer token of the signed-in user
    pub const TOKEN: &str = "token";
    /// Preferred locale code
    pub const LOCALE: &str = "locale";
    /// Preferred theme mode
    pub const THEME: &str = "theme";
}

/// [`KeyValueStore`] backed by a JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the file at `path`, starting empty when it does not exist yet
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] if the file exists but cannot be read
    /// - [`StorageError::Corrupt`] if it does not hold a JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(format!("{}: {e}", path.display()))),
        };

        debug!(path = %path.display(), entries = entries.len(), "Storage opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json).map_err(|e| self.io_error(&e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(&e))
    }

    fn io_error(&self, error: &std::io::Error) -> StorageError {
        warn!(path = %self.path.display(), error = %error, "Storage write failed");
        StorageError::Io(format!("{}: {error}", self.path.display()))
    }

    fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        if change(&mut next) {
            self.persist(&next)?;
            *entries = next;
        }
        Ok(())
    }
}

/// Run `write` against `storage` on tokio's blocking pool
///
/// # Errors
///
/// Returns the error of `write`, or [`StorageError::Io`] if the blocking
/// task panicked or was cancelled.
pub async fn write_blocking<F>(storage: &Arc<dyn KeyValueStore>, write: F) -> Result<(), StorageError>
where
    F: FnOnce(&dyn KeyValueStore) -> Result<(), StorageError> + Send + 'static,
{
    let storage = Arc::clone(storage);
    tokio::task::spawn_blocking(move || write(storage.as_ref()))
        .await
        .map_err(|e| StorageError::Io(format!("storage task failed: {e}")))?
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(keys::NAME, "Alice").unwrap();
        storage.set(keys::TOKEN, "abc").unwrap();
        storage.remove(keys::TOKEN).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(keys::NAME).as_deref(), Some("Alice"));
        assert_eq!(reopened.get(keys::TOKEN), None);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(storage.get(keys::LOCALE), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        let storage = FileStorage::open(blocker.join("storage.json")).unwrap();
        fs::write(&blocker, "not a directory").unwrap();

        assert!(matches!(
            storage.set(keys::TOKEN, "abc"),
            Err(StorageError::Io(_))
        ));
        assert_eq!(storage.get(keys::TOKEN), None);
    }

    #[test]
    fn failed_removal_keeps_the_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("storage.json");
        let storage = FileStorage::open(&path).unwrap();
        storage.set(keys::TOKEN, "abc").unwrap();

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path.parent().unwrap(), "not a directory").unwrap();

        assert!(storage.remove(keys::TOKEN).is_err());
        assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn blocking_writes_reach_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::open(&path).unwrap());

        write_blocking(&storage, |s| s.set(keys::THEME, "dark"))
            .await
            .unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(keys::THEME).as_deref(), Some("dark"));
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Corrupt(_))
        ));
    }
}
