//! Local key-value storage port and backends.
//!
//! The cart persists as a single text blob under a fixed key, so the port is
//! deliberately small: whole-value `get` and `set`. Backends supply the
//! device storage primitive.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::fs;

use crate::error::StorageError;

/// Async key-value storage for cart blobs.
///
/// Implementations must tolerate whole-value overwrites on every call to
/// [`set`](Self::set); values are read back whole once at store startup.
#[async_trait]
pub trait CartStorage: Send + Sync + 'static {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails; a missing key is
    /// `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails. Partial writes must not
    /// be observable by a later [`get`](Self::get).
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed storage: one file per key under a base directory.
///
/// Writes use a temp-file-then-rename pattern so a crash mid-write leaves the
/// previous blob intact rather than a truncated one. File I/O runs on the
/// blocking pool.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`.
    ///
    /// The directory is created on the first write.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Map a storage key to a file path, sanitizing characters that are not
    /// filesystem-safe (`@pocket-market:cart` -> `_pocket-market_cart.json`).
    fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{name}.json"))
    }
}

#[async_trait]
impl CartStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.entry_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let base = self.base_path.clone();
        let path = self.entry_path(key);
        let value = value.to_owned();

        tokio::task::spawn_blocking(move || write_atomic(&base, &path, value.as_bytes()))
            .await??;
        Ok(())
    }
}

/// Write `bytes` to `path` atomically: temp file in the same directory,
/// flushed, then renamed over the destination.
fn write_atomic(base: &Path, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    std::fs::create_dir_all(base)?;

    let mut tmp = tempfile::NamedTempFile::new_in(base)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StorageError::Io(e.error))?;
    Ok(())
}

/// In-process storage for tests and previews.
///
/// Cloning shares the underlying map. `set_fail_writes` injects write
/// failures so best-effort persistence paths can be exercised.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<std::sync::Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent [`set`](CartStorage::set) fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Inspect the raw value stored under `key`, if any.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .get(key)
            .cloned()
    }

    /// Seed a raw value, bypassing the trait (useful for hydration tests).
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.to_owned(), value.to_owned());
    }
}

#[async_trait]
impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other(
                "simulated storage failure",
            )));
        }
        self.insert(key, value);
        Ok(())
    }
}
