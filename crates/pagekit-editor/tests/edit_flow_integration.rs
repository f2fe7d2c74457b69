//! Integration tests for the admin edit flow.
//!
//! These exercise `EditSession` and `ConfigStore` together against the real
//! storage backends, the way `pagekit set` and the page shell drive them.

use pagekit_core::{default_site_document, FieldPath};
use pagekit_editor::application::config_store::{ConfigStore, DefaultReason, LoadSource};
use pagekit_editor::application::edit_session::{DiscardPolicy, EditError, EditSession};
use pagekit_editor::application::persistence::{
    KeyValueStore, PersistError, StorageError, SITE_CONFIG_KEY,
};
use pagekit_editor::infrastructure::storage::{FileStore, MemoryStore};
use uuid::Uuid;

fn path(text: &str) -> FieldPath {
    FieldPath::parse(text).expect("test path must parse")
}

fn admin() -> EditSession {
    let mut session = EditSession::new(DiscardPolicy::Discard);
    session.set_admin_mode(true);
    session
}

/// Runs begin → update → commit on `field` and returns whether it persisted.
fn edit<S: KeyValueStore>(store: &mut ConfigStore<S>, field: &str, value: &str) -> bool {
    let mut session = admin();
    session.begin_edit(path(field), store.current()).unwrap();
    session.update_draft(value).unwrap();
    session.commit(store).unwrap().is_persisted()
}

// ── Happy path ────────────────────────────────────────────────────────────────

#[test]
fn test_commit_updates_document_and_writes_once() {
    // Arrange
    let mut store = ConfigStore::load_default(MemoryStore::new());
    let mut session = admin();

    // Act
    session.begin_edit(path("heroTitle"), store.current()).unwrap();
    session.update_draft("Hello").unwrap();
    let outcome = session.commit(&mut store).unwrap();

    // Assert
    assert!(outcome.is_persisted());
    assert_eq!(store.current().get(&path("heroTitle")).unwrap(), "Hello");
    assert_eq!(store.storage().write_count(), 1);
    assert!(!session.is_editing());
}

#[test]
fn test_committed_edit_survives_reload() {
    // Arrange
    let mut store = ConfigStore::load_default(MemoryStore::new());
    assert!(edit(&mut store, "affiliateLinks.amazon", "https://amzn.to/x"));

    // Act
    let source = store.reload();

    // Assert
    assert_eq!(source, LoadSource::Persisted);
    assert_eq!(
        store.current().get(&path("affiliateLinks.amazon")).unwrap(),
        "https://amzn.to/x"
    );
}

#[test]
fn test_only_the_edited_field_changes() {
    let mut store = ConfigStore::load_default(MemoryStore::new());
    edit(&mut store, "siteName", "Renamed");

    let defaults = default_site_document();
    for leaf in defaults.leaf_paths() {
        if leaf == path("siteName") {
            continue;
        }
        assert_eq!(
            store.current().get(&leaf).unwrap(),
            defaults.get(&leaf).unwrap(),
            "{leaf} must keep its default"
        );
    }
}

// ── Cancel / discard ──────────────────────────────────────────────────────────

#[test]
fn test_cancel_leaves_document_and_storage_untouched() {
    // Arrange
    let mut store = ConfigStore::load_default(MemoryStore::new());
    let before = store.current().clone();
    let mut session = admin();
    session.begin_edit(path("heroTitle"), store.current()).unwrap();
    session.update_draft("Scratch").unwrap();

    // Act
    let dropped = session.cancel().expect("draft was open");

    // Assert
    assert_eq!(dropped.value(), "Scratch");
    assert_eq!(store.current(), &before);
    assert_eq!(store.storage().write_count(), 0);
}

#[test]
fn test_leaving_admin_mode_discards_draft() {
    let store = ConfigStore::load_default(MemoryStore::new());
    let mut session = admin();
    session.begin_edit(path("heroTitle"), store.current()).unwrap();

    assert!(!session.toggle_admin_mode());
    assert!(!session.is_editing());
    assert_eq!(session.update_draft("x"), Err(EditError::NotEditing));
}

#[test]
fn test_reject_dirty_policy_keeps_open_draft() {
    // Arrange
    let store = ConfigStore::load_default(MemoryStore::new());
    let mut session = EditSession::new(DiscardPolicy::RejectDirty);
    session.set_admin_mode(true);
    session.begin_edit(path("heroTitle"), store.current()).unwrap();
    session.update_draft("Unsaved").unwrap();

    // Act
    let result = session.begin_edit(path("siteName"), store.current());

    // Assert
    assert_eq!(
        result,
        Err(EditError::UnsavedDraft {
            path: "heroTitle".to_string()
        })
    );
    assert_eq!(session.draft().unwrap().value(), "Unsaved");
}

#[test]
fn test_editing_outside_admin_mode_is_rejected() {
    let store = ConfigStore::load_default(MemoryStore::new());
    let mut session = EditSession::new(DiscardPolicy::Discard);

    let result = session.begin_edit(path("heroTitle"), store.current());

    assert_eq!(result, Err(EditError::NotInAdminMode));
}

// ── Load fallbacks ────────────────────────────────────────────────────────────

#[test]
fn test_stored_invalid_json_loads_defaults() {
    let storage = MemoryStore::new().with_entry(SITE_CONFIG_KEY, "{not json");

    let store = ConfigStore::load_default(storage);

    assert_eq!(store.current(), &default_site_document());
    assert_eq!(store.source(), LoadSource::Defaults(DefaultReason::Malformed));
}

#[test]
fn test_stored_document_missing_a_field_loads_defaults() {
    // Arrange – a valid document with one leaf removed
    let partial = r#"{"siteName":"Partial"}"#;
    let storage = MemoryStore::new().with_entry(SITE_CONFIG_KEY, partial);

    // Act
    let store = ConfigStore::load_default(storage);

    // Assert
    assert_eq!(store.current(), &default_site_document());
    assert_eq!(
        store.source(),
        LoadSource::Defaults(DefaultReason::ShapeMismatch)
    );
}

#[test]
fn test_reset_clears_storage() {
    // Arrange
    let mut store = ConfigStore::load_default(MemoryStore::new());
    edit(&mut store, "heroTitle", "Hello");

    // Act
    store.reset_to_defaults().unwrap();

    // Assert
    assert_eq!(store.current(), &default_site_document());
    assert!(store.storage().get(SITE_CONFIG_KEY).is_none());
    assert_eq!(
        store.reload(),
        LoadSource::Defaults(DefaultReason::Missing)
    );
}

// ── Persist failures ──────────────────────────────────────────────────────────

#[test]
fn test_quota_exceeded_keeps_edit_in_memory() {
    // Arrange – far too small for the site document
    let mut store = ConfigStore::load_default(MemoryStore::with_quota(16));
    let mut session = admin();
    session.begin_edit(path("heroTitle"), store.current()).unwrap();
    session.update_draft("Hello").unwrap();

    // Act
    let outcome = session.commit(&mut store).unwrap();

    // Assert
    assert!(matches!(
        outcome.persisted,
        Err(PersistError::Storage(StorageError::QuotaExceeded { .. }))
    ));
    assert_eq!(store.current().get(&path("heroTitle")).unwrap(), "Hello");
    assert!(!session.is_editing());
}

#[test]
fn test_unavailable_storage_keeps_edit_until_reload() {
    // Arrange
    let mut storage = MemoryStore::new();
    storage.set_disabled(true);
    let mut store = ConfigStore::load_default(storage);
    assert_eq!(
        store.source(),
        LoadSource::Defaults(DefaultReason::Unreadable)
    );

    // Act
    let persisted = edit(&mut store, "heroTitle", "Hello");
    let after_edit = store.current().get(&path("heroTitle")).unwrap().to_owned();
    store.storage_mut().set_disabled(false);
    store.reload();

    // Assert
    assert!(!persisted);
    assert_eq!(after_edit, "Hello");
    assert_eq!(store.current(), &default_site_document());
}

// ── File backend ──────────────────────────────────────────────────────────────

#[test]
fn test_file_store_round_trip_across_instances() {
    // Arrange
    let dir = std::env::temp_dir().join(format!("pagekit_flow_{}", Uuid::new_v4()));
    let mut first = ConfigStore::load_default(FileStore::new(&dir));
    assert_eq!(first.source(), LoadSource::Defaults(DefaultReason::Missing));

    // Act
    assert!(edit(&mut first, "siteName", "From disk"));
    let second = ConfigStore::load_default(FileStore::new(&dir));

    // Assert
    assert_eq!(second.source(), LoadSource::Persisted);
    assert_eq!(second.current().get(&path("siteName")).unwrap(), "From disk");
    assert!(dir.join("siteConfig.json").exists());

    std::fs::remove_dir_all(&dir).ok();
}
