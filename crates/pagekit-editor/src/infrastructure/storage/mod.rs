//! Storage infrastructure: key-value backends and the settings file.
//!
//! - `file`     – [`KeyValueStore`](crate::application::persistence::KeyValueStore)
//!   over one JSON file per key, used by the `pagekit` binary.
//! - `memory`   – In-memory backend with an optional byte quota and an
//!   "unavailable" switch, standing in for a browser's `localStorage`.
//! - `settings` – The TOML editor settings file.

pub mod file;
pub mod memory;
pub mod settings;

pub use file::FileStore;
pub use memory::MemoryStore;
