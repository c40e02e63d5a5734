//! Persistence of the selected locale state.
//!
//! Storage failures are never fatal to the service: it logs them and falls
//! back to negotiated or configured defaults.

use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use horizon_l10n_core::logging::targets;
use parking_lot::{Mutex, RwLock};

use crate::config::StorageStrategy;
use crate::error::{Dimension, StorageError};

/// Key/value backend for the locale state.
pub trait LocaleStorage: Send + Sync {
    /// Read a value; `Ok(None)` if nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage key of a dimension: `"<prefix><dimension>"`.
pub fn storage_key(prefix: &str, dimension: Dimension) -> String {
    format!("{prefix}{}", dimension.as_str())
}

/// Build the backend selected by a [`StorageStrategy`].
pub fn from_strategy(strategy: &StorageStrategy) -> Result<Arc<dyn LocaleStorage>, StorageError> {
    Ok(match strategy {
        StorageStrategy::Memory => Arc::new(MemoryStorage::new()),
        StorageStrategy::File { path: Some(path) } => Arc::new(FileStorage::new(path)),
        StorageStrategy::File { path: None } => Arc::new(FileStorage::default_location()?),
        StorageStrategy::Disabled => Arc::new(NoStorage),
    })
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl LocaleStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl LocaleStorage for NoStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A JSON object on disk, rewritten atomically on every write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Store state in the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `locale.json` in the platform configuration directory.
    pub fn default_location() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("com", "Horizon Analytic Studios", "horizon-l10n")
            .ok_or(StorageError::Unavailable)?;
        Ok(Self::new(dirs.config_dir().join("locale.json")))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let source = match std::fs::read_to_string(&self.path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&source).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_error = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(io_error)?;

        let json = serde_json::to_string_pretty(values).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let mut file = tempfile::NamedTempFile::new_in(parent).map_err(io_error)?;
        file.write_all(json.as_bytes()).map_err(io_error)?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(&self.path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

impl LocaleStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut values = match self.load() {
            Ok(values) => values,
            Err(error @ StorageError::Corrupt { .. }) => {
                tracing::warn!(target: targets::STORAGE, %error, "replacing corrupt locale storage");
                BTreeMap::new()
            }
            Err(error) => return Err(error),
        };
        values.insert(key.to_string(), value.to_string());
        self.save(&values)?;
        tracing::trace!(target: targets::STORAGE, key, value, path = %self.path.display(), "stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key("app.", Dimension::Language), "app.language");
        assert_eq!(storage_key("", Dimension::DefaultLocale), "default_locale");
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("a").unwrap(), None);
        storage.write("a", "1").unwrap();
        storage.write("a", "2").unwrap();
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_no_storage() {
        NoStorage.write("a", "1").unwrap();
        assert_eq!(NoStorage.read("a").unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("locale.json");

        let storage = FileStorage::new(&path);
        assert_eq!(storage.read("language").unwrap(), None);
        storage.write("language", "fr-FR").unwrap();
        storage.write("currency", "EUR").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.read("language").unwrap().as_deref(), Some("fr-FR"));
        assert_eq!(reopened.read("currency").unwrap().as_deref(), Some("EUR"));
    }

    #[test]
    fn test_file_storage_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locale.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.read("language"),
            Err(StorageError::Corrupt { .. })
        ));

        storage.write("language", "de").unwrap();
        assert_eq!(storage.read("language").unwrap().as_deref(), Some("de"));
    }

    #[test]
    fn test_from_strategy() {
        let storage = from_strategy(&StorageStrategy::Disabled).unwrap();
        storage.write("k", "v").unwrap();
        assert_eq!(storage.read("k").unwrap(), None);

        let storage = from_strategy(&StorageStrategy::Memory).unwrap();
        storage.write("k", "v").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v"));
    }
}
