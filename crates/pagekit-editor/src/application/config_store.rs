//! ConfigStore: the single source of truth for editable site content.
//!
//! # Loading (for beginners)
//!
//! On start-up the store reads the bytes saved under [`SITE_CONFIG_KEY`] and
//! tries to turn them back into a [`ConfigDocument`].  Anything that goes
//! wrong falls back to the compiled-in defaults:
//!
//! ```text
//! read(key) ──► None ─────────────────────────────► defaults (Missing)
//!     │
//!     ├──────► Err ──────────────────────────────► defaults (Unreadable)
//!     │
//!     └──────► bytes ──► JSON parse fails ───────► defaults (Malformed)
//!                          │
//!                          ├──► wrong fields ─────► defaults (ShapeMismatch)
//!                          │
//!                          └──► same fields ──────► stored document (Persisted)
//! ```
//!
//! A partially valid document is never accepted: one missing, extra, or
//! wrongly-typed field discards the whole stored value.  Loading never fails;
//! the outcome is available through [`ConfigStore::source`].

use pagekit_core::{default_site_document, ConfigDocument, FieldPath, PathError};
use tracing::{debug, info, warn};

use super::persistence::{KeyValueStore, PersistError, StorageError, SITE_CONFIG_KEY};

/// Why the store is holding the default document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultReason {
    /// Nothing was stored yet.
    Missing,
    /// The storage backend failed to read.
    Unreadable,
    /// The stored bytes are not a JSON document of string leaves.
    Malformed,
    /// The stored document parsed but its fields differ from the defaults.
    ShapeMismatch,
    /// [`ConfigStore::reset_to_defaults`] was called.
    Reset,
}

/// Where the current document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    Defaults(DefaultReason),
}

/// Owns the current document, the defaults it is validated against, and the
/// storage backend it is persisted to.
#[derive(Debug)]
pub struct ConfigStore<S> {
    storage: S,
    defaults: ConfigDocument,
    current: ConfigDocument,
    source: LoadSource,
}

impl<S: KeyValueStore> ConfigStore<S> {
    /// Loads the stored document from `storage`, falling back to `defaults`.
    pub fn load(storage: S, defaults: ConfigDocument) -> Self {
        let (current, source) = read_document(&storage, &defaults);
        Self {
            storage,
            defaults,
            current,
            source,
        }
    }

    /// [`load`](Self::load) with the compiled-in site defaults.
    pub fn load_default(storage: S) -> Self {
        Self::load(storage, default_site_document())
    }

    /// The latest document.
    pub fn current(&self) -> &ConfigDocument {
        &self.current
    }

    pub fn defaults(&self) -> &ConfigDocument {
        &self.defaults
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    /// Writes `value` at `path` in memory and returns the new document.
    ///
    /// # Errors
    ///
    /// Returns the [`PathError`] from [`ConfigDocument::set`]; the current
    /// document is left as it was.
    pub fn apply_edit(
        &mut self,
        path: &FieldPath,
        value: impl Into<String>,
    ) -> Result<&ConfigDocument, PathError> {
        self.current = self.current.set(path, value)?;
        Ok(&self.current)
    }

    /// Writes the current document to storage as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if encoding or the storage write fails.  The
    /// in-memory document is not affected either way.
    pub fn persist(&mut self) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec(&self.current)?;
        self.storage.write(SITE_CONFIG_KEY, &bytes)?;
        debug!(bytes = bytes.len(), "site document persisted");
        Ok(())
    }

    /// Re-reads storage as a fresh page load would.
    pub fn reload(&mut self) -> LoadSource {
        let (current, source) = read_document(&self.storage, &self.defaults);
        self.current = current;
        self.source = source;
        source
    }

    /// Restores the defaults in memory and deletes the stored document.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] if the key could not be
    /// removed; the in-memory document is reset regardless.
    pub fn reset_to_defaults(&mut self) -> Result<(), StorageError> {
        self.current = self.defaults.clone();
        self.source = LoadSource::Defaults(DefaultReason::Reset);
        self.storage.remove(SITE_CONFIG_KEY)?;
        info!("site document reset to defaults");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

fn read_document<S>(storage: &S, defaults: &ConfigDocument) -> (ConfigDocument, LoadSource)
where
    S: KeyValueStore + ?Sized,
{
    let fallback = |reason| (defaults.clone(), LoadSource::Defaults(reason));

    let bytes = match storage.read(SITE_CONFIG_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("no stored site document, using defaults");
            return fallback(DefaultReason::Missing);
        }
        Err(e) => {
            warn!("stored site document unreadable, using defaults: {e}");
            return fallback(DefaultReason::Unreadable);
        }
    };

    match serde_json::from_slice::<ConfigDocument>(&bytes) {
        Ok(document) if document.conforms_to(defaults) => {
            info!(bytes = bytes.len(), "loaded stored site document");
            (document, LoadSource::Persisted)
        }
        Ok(_) => {
            warn!("stored site document has unexpected fields, using defaults");
            fallback(DefaultReason::ShapeMismatch)
        }
        Err(e) => {
            warn!("stored site document is malformed, using defaults: {e}");
            fallback(DefaultReason::Malformed)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
