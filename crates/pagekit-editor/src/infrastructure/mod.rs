//! Infrastructure layer for the site editor.
//!
//! Contains the OS-facing adapters: storage backends, the editor settings
//! file, the JSON presentation bridge, and the tokio page runtime.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pagekit_core`, but MUST NOT be imported by the `application` layer.

pub mod runtime;
pub mod storage;
pub mod ui_bridge;
