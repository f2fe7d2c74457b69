//! pagekit-editor library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the `pagekit` binary in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;
