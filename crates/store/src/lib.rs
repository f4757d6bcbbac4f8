//! Credential storage backends for the cached access token.
//!
//! Provides an in-memory slot (the default, reset on restart) and a
//! SQLite-backed store for reuse across restarts.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;
