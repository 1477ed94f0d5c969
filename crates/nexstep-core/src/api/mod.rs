//! REST API client module for the NexStep backend.
//!
//! This module provides the `Backend` trait the store and cache call into,
//! the `ApiClient` HTTP implementation, and `CachedApi` for memoized reads.
//!
//! The backend authenticates requests with a bearer token obtained from
//! `/auth/login` and wraps every payload in a `{success, data, message}`
//! envelope.

pub mod backend;
pub mod cached;
pub mod client;
pub mod envelope;
pub mod error;

pub use backend::Backend;
pub use cached::CachedApi;
pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::ApiError;
