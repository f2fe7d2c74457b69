//! File-backed key-value store.
//!
//! Each key maps to `<dir>/<key>.json`.  Writes go to a uniquely named
//! temporary file in the same directory which is then renamed over the
//! target, so a crash mid-write leaves either the old value or the new one,
//! never a truncated file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::application::persistence::{KeyValueStore, StorageError};

/// [`KeyValueStore`] rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.  Characters outside `[A-Za-z0-9_-]` are replaced
    /// so a key can never escape the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let target = self.path_for(key);
        let temp = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));
        std::fs::write(&temp, value).map_err(|e| io_error(&temp, e))?;
        if let Err(e) = std::fs::rename(&temp, &target) {
            std::fs::remove_file(&temp).ok();
            return Err(io_error(&target, e));
        }

        debug!(path = %target.display(), bytes = value.len(), "stored value written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}
