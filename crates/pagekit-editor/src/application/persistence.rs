//! Storage port for the site document.
//!
//! The editor only needs three operations from its backing store: read the
//! bytes under a key, replace them, and delete them.  Browsers offer exactly
//! this through `localStorage`; the host binary uses one file per key (see
//! `infrastructure::storage`).
//!
//! # Testability
//!
//! `KeyValueStore` is annotated with `mockall::automock` in test builds, so
//! unit tests can inject quota errors and unreadable storage without touching
//! the file system.

use std::path::PathBuf;

use thiserror::Error;

/// Key under which the site document is stored.
pub const SITE_CONFIG_KEY: &str = "siteConfig";

/// Failure reported by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would exceed the backend's size limit.
    #[error("storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// The backend refuses all access (private browsing, disabled storage).
    #[error("storage is unavailable")]
    Unavailable,

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to persist the current document.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The document could not be encoded as JSON.
    #[error("failed to serialize site document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend rejected the write.
    #[error("failed to write site document: {0}")]
    Storage(#[from] StorageError),
}

/// Byte-oriented key-value storage.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Returns the bytes stored under `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the bytes stored under `key`.
    ///
    /// Either the full value is stored or the previous value is kept.
    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Deletes `key`.  Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
