//! Application layer use cases for the site editor.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The application layer sits between the domain types in `pagekit_core`
//! (documents, rate limiters, the viewport observer) and the infrastructure
//! (files, stdin/stdout, the tokio runtime).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "edit the
//!   hero title and keep the change across a reload").
//! - **Depend on abstractions** ([`persistence::KeyValueStore`]) rather than
//!   concrete storage, so the backend can be swapped without changing this
//!   code.
//! - **Contain no file system access and no I/O of their own**.
//!
//! # Sub-modules
//!
//! - **`persistence`**  – The key-value storage port and its error types.
//!
//! - **`config_store`** – Owns the site document: loads it (falling back to
//!   defaults), applies path writes and persists it.
//!
//! - **`edit_session`** – The admin-mode gated `Idle` / `Editing` state
//!   machine that turns user intents into committed document writes.
//!
//! - **`page_shell`**   – Composes everything above with the viewport
//!   observer, rate limiters and notification queue for one page session.

pub mod config_store;
pub mod edit_session;
pub mod page_shell;
pub mod persistence;
