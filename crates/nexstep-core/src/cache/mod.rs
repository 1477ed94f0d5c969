//! In-memory read-through cache for backend reads.
//!
//! This module provides the `CacheManager`, a key/value cache with a TTL per
//! entry. Reads through `cached_call` fall back to the last known value when
//! the backend call fails, trading freshness for availability.
//!
//! Typical cached reads and their lifetimes are listed in [`ttl`].

pub mod manager;
pub mod ttl;

pub use manager::{CacheManager, CacheStats, CallOptions, Cached, DEFAULT_TTL, SWEEP_INTERVAL};
