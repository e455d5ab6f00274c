use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::io::lock::{LockError, StoreLock};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode store: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Directory receiving the recovery log for this store, if any
    fn recovery_dir(&self) -> Option<&Path> {
        None
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn recovery_dir(&self) -> Option<&Path> {
        (**self).recovery_dir()
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local store. Never fails.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set`/`remove` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.shift_remove(key);
        self.writes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

/// A JSON object file mapping keys to string values.
///
/// Every write is a locked read-modify-write followed by an atomic rename,
/// so concurrent `tl` processes never lose each other's keys. Key order in
/// the file is preserved.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    dir: PathBuf,
    /// Raw content of a file that failed to parse, already sent to the
    /// recovery log. Avoids logging the same bytes on every read.
    logged_corrupt: RefCell<Option<String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        FileStore {
            path,
            dir,
            logged_corrupt: RefCell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole map. Missing file is empty; an unparseable file is
    /// treated as empty after its content is copied to the recovery log.
    fn read_map(&self) -> Result<IndexMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                self.log_corrupt(&content, &e);
                Ok(IndexMap::new())
            }
        }
    }

    fn log_corrupt(&self, content: &str, err: &serde_json::Error) {
        let mut logged = self.logged_corrupt.borrow_mut();
        if logged.as_deref() == Some(content) {
            return;
        }
        recovery::log_recovery(
            &self.dir,
            RecoveryEntry::new(RecoveryCategory::Parser, "unreadable store file")
                .field("File", self.path.display().to_string())
                .field("Error", err.to_string())
                .body(content),
        );
        *logged = Some(content.to_string());
    }

    fn write_map(&self, map: &IndexMap<String, String>) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(map)?;
        content.push('\n');
        recovery::atomic_write(&self.path, content.as_bytes()).map_err(|e| {
            StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    fn modify(
        &mut self,
        f: impl FnOnce(&mut IndexMap<String, String>),
    ) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::WriteError {
            path: self.dir.clone(),
            source: e,
        })?;
        let _lock = StoreLock::acquire_default(&self.path)?;
        let mut map = self.read_map()?;
        f(&mut map);
        self.write_map(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.shift_remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.modify(|map| {
            map.shift_remove(key);
        })
    }

    fn recovery_dir(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}
