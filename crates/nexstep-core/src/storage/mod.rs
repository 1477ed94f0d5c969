//! Durable key/value storage for session and onboarding state.
//!
//! The store persists a handful of string values under fixed keys so a
//! session survives restarts. Persistence is best-effort: callers log
//! `StorageError`s and carry on with in-memory state.
//!
//! Two backends are provided:
//! - `FileStorage`: one file per key inside a directory
//! - `MemoryStorage`: process-local map, used by tests and ephemeral runs

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Key holding the JSON-encoded `UserProfile` of the current session.
pub const USER_KEY: &str = "user";

/// Key holding the bearer token of the current session.
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-encoded onboarding snapshot (goal, level, last progress).
pub const ONBOARDING_KEY: &str = "nexstep_onboarding";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// `getItem`/`setItem`/`removeItem`-shaped persistence.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
