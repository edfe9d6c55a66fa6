//! File-backed key-value store.
//!
//! One file per key (`<dir>/<key>.json`) holding the raw JSON text.
//! Writes go through a temp file + fsync + atomic rename while an exclusive
//! lock file is held, so a reader never observes a half-written value.

use hotai_core::error::{HotaiError, Result};
use hotai_core::storage::KeyValueStore;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Errors that can occur during file store operations.
#[derive(Debug)]
pub enum FileStoreError {
    /// File I/O error.
    IoError(std::io::Error),
    /// File locking error.
    LockError(String),
    /// Key contains characters that cannot be used as a file name.
    InvalidKey(String),
}

impl std::fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStoreError::IoError(e) => write!(f, "I/O error: {}", e),
            FileStoreError::LockError(e) => write!(f, "Lock error: {}", e),
            FileStoreError::InvalidKey(k) => write!(f, "Invalid key: '{}'", k),
        }
    }
}

impl std::error::Error for FileStoreError {}

impl From<std::io::Error> for FileStoreError {
    fn from(e: std::io::Error) -> Self {
        FileStoreError::IoError(e)
    }
}

impl From<FileStoreError> for HotaiError {
    fn from(e: FileStoreError) -> Self {
        HotaiError::storage(e.to_string())
    }
}

/// Durable [`KeyValueStore`] rooted at a directory.
///
/// Responsibilities:
/// - **Key → file mapping** (`[A-Za-z0-9_-]+` keys only)
/// - **Atomic write** (tmp file + rename)
/// - **Isolation** (exclusive lock file per key while writing)
///
/// Does NOT parse or validate the JSON it stores.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(FileStoreError::from)?;
        tracing::debug!("[FileKeyValueStore] Using directory {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> std::result::Result<PathBuf, FileStoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn read(&self, key: &str) -> std::result::Result<Option<String>, FileStoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, text: &str) -> std::result::Result<(), FileStoreError> {
        let path = self.path_for(key)?;
        let _lock = FileLock::acquire(&path)?;

        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(text.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read(key)?)
    }

    fn set_raw(&self, key: &str, text: &str) -> Result<()> {
        self.write(key, text).map_err(|e| {
            tracing::error!("[FileKeyValueStore] Failed to write '{}': {}", key, e);
            HotaiError::from(e)
        })
    }
}

fn validate_key(key: &str) -> std::result::Result<(), FileStoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(FileStoreError::InvalidKey(key.to_string()))
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The lock file itself stays on disk. Unlinking it would let a writer that
/// is still waiting on the old inode and a new writer locking a fresh file
/// both proceed.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> std::result::Result<Self, FileStoreError> {
        let lock_path = path.with_extension("lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| FileStoreError::LockError(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file })
    }
}
