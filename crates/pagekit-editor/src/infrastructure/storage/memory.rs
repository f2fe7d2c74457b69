//! In-memory key-value store with browser-like failure modes.

use std::collections::HashMap;

use crate::application::persistence::{KeyValueStore, StorageError};

/// [`KeyValueStore`] kept in a `HashMap`.
///
/// `quota` caps the total bytes across all keys, the way `localStorage`
/// caps an origin.  A disabled store fails every call with
/// [`StorageError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    quota: Option<usize>,
    disabled: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Builder-style seed for tests and demos.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Total stored bytes.
    pub fn used(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    fn ensure_enabled(&self) -> Result<(), StorageError> {
        if self.disabled {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.ensure_enabled()?;
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.ensure_enabled()?;
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, Vec::len);
            let available = quota.saturating_sub(self.used() - replaced);
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    available,
                });
            }
        }
        self.entries.insert(key.to_owned(), value.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.ensure_enabled()?;
        self.entries.remove(key);
        Ok(())
    }
}
