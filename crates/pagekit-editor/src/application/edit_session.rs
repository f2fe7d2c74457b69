//! EditSession: the in-place field editor state machine.
//!
//! # States (for beginners)
//!
//! ```text
//!                begin_edit(path)
//!        ┌──────────────────────────────┐
//!        │                              ▼
//!      Idle ◄──── commit / cancel ── Editing(draft)
//!                                       │   ▲
//!                                       └───┘ update_draft / begin_edit(other)
//! ```
//!
//! On top of this sits *admin mode*: the site's "Modo Admin" switch.  Outside
//! admin mode nothing is editable, and switching admin mode off cancels any
//! open draft.
//!
//! A draft is only a proposal.  The document in the [`ConfigStore`] changes on
//! [`EditSession::commit`] and at no other time.

use pagekit_core::{ConfigDocument, FieldPath, PathError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config_store::ConfigStore;
use super::persistence::{KeyValueStore, PersistError};

/// What happens to an open draft when another field is opened for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscardPolicy {
    /// Drop the open draft silently.
    #[default]
    Discard,
    /// Refuse while the open draft differs from its original value.
    RejectDirty,
}

/// Errors for illegal edit transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("editing requires admin mode")]
    NotInAdminMode,

    #[error("no field is being edited")]
    NotEditing,

    /// Raised under [`DiscardPolicy::RejectDirty`].
    #[error("{path} has unsaved changes")]
    UnsavedDraft { path: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// A not-yet-committed value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    path: FieldPath,
    original: String,
    value: String,
}

impl Draft {
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The field's value when editing started.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `true` once the draft differs from the original value.
    pub fn is_dirty(&self) -> bool {
        self.value != self.original
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(Draft),
}

/// Result of a commit that reached the document.
///
/// `persisted` carries the storage outcome separately: a failed write does
/// not undo the in-memory edit.
#[derive(Debug)]
pub struct CommitOutcome {
    pub path: FieldPath,
    pub value: String,
    pub persisted: Result<(), PersistError>,
}

impl CommitOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// The edit-mode state machine.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
    admin_mode: bool,
    policy: DiscardPolicy,
}

impl EditSession {
    pub fn new(policy: DiscardPolicy) -> Self {
        Self {
            state: EditState::Idle,
            admin_mode: false,
            policy,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            EditState::Editing(draft) => Some(draft),
            EditState::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn admin_mode(&self) -> bool {
        self.admin_mode
    }

    pub fn policy(&self) -> DiscardPolicy {
        self.policy
    }

    /// Switches admin mode.  Turning it off cancels the open draft, which is
    /// returned.
    pub fn set_admin_mode(&mut self, enabled: bool) -> Option<Draft> {
        self.admin_mode = enabled;
        debug!(enabled, "admin mode changed");
        if enabled {
            None
        } else {
            self.cancel()
        }
    }

    /// Flips admin mode and returns the new value.
    pub fn toggle_admin_mode(&mut self) -> bool {
        self.set_admin_mode(!self.admin_mode);
        self.admin_mode
    }

    /// Opens `path` for editing, seeding the draft with its current value in
    /// `document`.
    ///
    /// Returns the draft this replaced, if any.
    ///
    /// # Errors
    ///
    /// - [`EditError::NotInAdminMode`] outside admin mode.
    /// - [`EditError::Path`] if `path` does not name a leaf of `document`.
    /// - [`EditError::UnsavedDraft`] under [`DiscardPolicy::RejectDirty`] when
    ///   the open draft has changes.
    ///
    /// The open draft is kept on every error.
    pub fn begin_edit(
        &mut self,
        path: FieldPath,
        document: &ConfigDocument,
    ) -> Result<Option<Draft>, EditError> {
        if !self.admin_mode {
            return Err(EditError::NotInAdminMode);
        }
        let original = document.get(&path)?.to_owned();

        if let EditState::Editing(open) = &self.state {
            if self.policy == DiscardPolicy::RejectDirty && open.is_dirty() {
                return Err(EditError::UnsavedDraft {
                    path: open.path.to_string(),
                });
            }
        }

        debug!(%path, "editing started");
        let draft = Draft {
            path,
            value: original.clone(),
            original,
        };
        match std::mem::replace(&mut self.state, EditState::Editing(draft)) {
            EditState::Editing(previous) => Ok(Some(previous)),
            EditState::Idle => Ok(None),
        }
    }

    /// Replaces the draft value.
    ///
    /// # Errors
    ///
    /// [`EditError::NotEditing`] while idle.
    pub fn update_draft(&mut self, value: impl Into<String>) -> Result<(), EditError> {
        match &mut self.state {
            EditState::Editing(draft) => {
                draft.value = value.into();
                Ok(())
            }
            EditState::Idle => Err(EditError::NotEditing),
        }
    }

    /// Drops the draft without touching any document.
    pub fn cancel(&mut self) -> Option<Draft> {
        match std::mem::take(&mut self.state) {
            EditState::Editing(draft) => {
                debug!(path = %draft.path, "draft discarded");
                Some(draft)
            }
            EditState::Idle => None,
        }
    }

    /// Writes the draft into `store`, persists, and returns to `Idle`.
    ///
    /// # Errors
    ///
    /// [`EditError::NotEditing`] while idle, or [`EditError::Path`] if the
    /// store's document no longer has the field (the draft is kept).  A failed
    /// persist is *not* an error here; see [`CommitOutcome::persisted`].
    pub fn commit<S: KeyValueStore>(
        &mut self,
        store: &mut ConfigStore<S>,
    ) -> Result<CommitOutcome, EditError> {
        let draft = match std::mem::take(&mut self.state) {
            EditState::Editing(draft) => draft,
            EditState::Idle => return Err(EditError::NotEditing),
        };

        if let Err(e) = store.apply_edit(&draft.path, draft.value.clone()) {
            self.state = EditState::Editing(draft);
            return Err(e.into());
        }

        let persisted = store.persist();
        match &persisted {
            Ok(()) => info!(path = %draft.path, "field committed"),
            Err(e) => warn!(path = %draft.path, "field committed in memory only: {e}"),
        }

        Ok(CommitOutcome {
            path: draft.path,
            value: draft.value,
            persisted,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
