//! Core library for NexStep.
//!
//! This crate holds the client-side state and cache layer of the NexStep
//! career-roadmap application:
//!
//! - `store`: the reducer-driven session/domain store
//! - `cache`: the read-through TTL cache with stale-on-error fallback
//! - `api`: the typed client for the backend REST collaborator
//! - `storage`: durable key/value persistence used by the store
//! - `models`: shared domain types
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ApiError, Backend, CachedApi};
pub use cache::{CacheManager, CallOptions, Cached};
pub use config::Config;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{Action, AppState, Store};
