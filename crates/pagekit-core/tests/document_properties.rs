//! Property tests for the configuration document's path accessor.
//!
//! These run against the real default site document, so every path drawn is
//! one the editor can actually open.

use pagekit_core::{default_site_document, ConfigDocument, ConfigNode, FieldPath};
use proptest::prelude::*;

fn leaf_paths() -> Vec<FieldPath> {
    default_site_document().leaf_paths()
}

fn any_leaf_path() -> impl Strategy<Value = FieldPath> {
    prop::sample::select(leaf_paths())
}

fn any_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 #:/._-]{1,40}",
        any::<String>(),
    ]
}

proptest! {
    #[test]
    fn prop_get_after_set_returns_written_value(path in any_leaf_path(), value in any_value()) {
        let doc = default_site_document();
        let next = doc.set(&path, value.clone()).expect("leaf path must be writable");
        prop_assert_eq!(next.get(&path).expect("leaf path must be readable"), value.as_str());
    }

    #[test]
    fn prop_set_leaves_other_leaves_untouched(
        written in any_leaf_path(),
        other in any_leaf_path(),
        value in any_value(),
    ) {
        prop_assume!(written != other);
        let doc = default_site_document();
        let next = doc.set(&written, value).unwrap();
        prop_assert_eq!(next.get(&other).unwrap(), doc.get(&other).unwrap());
    }

    #[test]
    fn prop_set_is_idempotent(path in any_leaf_path(), value in any_value()) {
        let doc = default_site_document();
        let once = doc.set(&path, value.clone()).unwrap();
        let twice = once.set(&path, value).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_set_never_changes_the_original(path in any_leaf_path(), value in any_value()) {
        let doc = default_site_document();
        let before = doc.clone();
        let _ = doc.set(&path, value).unwrap();
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn prop_written_documents_keep_the_schema(
        writes in prop::collection::vec((any_leaf_path(), any_value()), 0..12),
    ) {
        let schema = default_site_document();
        let doc = writes
            .into_iter()
            .try_fold(schema.clone(), |doc, (path, value)| doc.set(&path, value))
            .unwrap();
        prop_assert!(doc.conforms_to(&schema));
    }

    #[test]
    fn prop_json_round_trip_preserves_document(
        writes in prop::collection::vec((any_leaf_path(), any_value()), 0..6),
    ) {
        let doc = writes
            .into_iter()
            .try_fold(default_site_document(), |doc, (path, value)| doc.set(&path, value))
            .unwrap();
        let json = serde_json::to_vec(&doc).unwrap();
        let restored: ConfigDocument = serde_json::from_slice(&json).unwrap();
        prop_assert_eq!(restored, doc);
    }

    #[test]
    fn prop_parse_display_round_trip(segments in prop::collection::vec("[a-zA-Z][a-zA-Z0-9]{0,8}", 1..5)) {
        let text = segments.join(".");
        let path = FieldPath::parse(&text).unwrap();
        prop_assert_eq!(path.to_string(), text);
        prop_assert_eq!(path.len(), segments.len());
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn test_unrelated_branch_is_shared_after_write() {
    // Arrange
    let doc = default_site_document();
    let links = FieldPath::parse("affiliateLinks").unwrap();

    // Act – write a root-level leaf
    let next = doc.set(&FieldPath::parse("heroTitle").unwrap(), "Hello").unwrap();

    // Assert – the affiliate-link branch was not copied
    match (doc.node(&links).unwrap(), next.node(&links).unwrap()) {
        (ConfigNode::Branch(before), ConfigNode::Branch(after)) => {
            assert!(std::sync::Arc::ptr_eq(before, after));
        }
        _ => panic!("affiliateLinks must be a branch"),
    }
}

#[test]
fn test_invalid_json_does_not_deserialise() {
    for stored in ["{not json", "[]", "null", r#"{"siteName":1}"#] {
        assert!(
            serde_json::from_str::<ConfigDocument>(stored).is_err(),
            "{stored} must be rejected"
        );
    }
}
