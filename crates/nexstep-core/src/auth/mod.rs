//! Authentication session handling.
//!
//! This module provides:
//! - `Session`: the bearer token plus the profile it belongs to
//! - `SessionPersistence`: reads and writes the session through a `Storage`
//!
//! The session is persisted under the fixed `user` and `token` keys so it
//! survives restarts.

pub mod session;

pub use session::{Session, SessionPersistence};
