use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Lifetime of an entry when the caller does not pick one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// How often the background sweeper drops expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

type Entries = Mutex<HashMap<String, CacheEntry>>;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(data: Value, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            data,
            created_at: now,
            expires_at,
        }
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Options for [`CacheManager::cached_call`].
#[derive(Debug, Clone, Copy)]
pub struct CallOptions {
    pub ttl: Duration,
    pub force_refresh: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            force_refresh: false,
        }
    }
}

impl CallOptions {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }
}

/// A cached read together with whether it came from the stale fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub data: T,
    pub stale: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
}

/// TTL cache shared by every reader of backend data.
///
/// Clone is cheap; clones share the same entries. Values are stored as JSON
/// so one cache can hold any serializable type.
#[derive(Clone, Default)]
pub struct CacheManager {
    entries: Arc<Entries>,
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a named fetch and its parameters: `"{name}_{json}"`.
    pub fn key<P: Serialize + ?Sized>(name: &str, params: &P) -> String {
        let params = serde_json::to_string(params).unwrap_or_else(|e| {
            warn!(name, error = %e, "Failed to serialize cache key params");
            "{}".to_string()
        });
        format!("{}_{}", name, params)
    }

    /// A poisoned lock only means another reader panicked mid-operation; the
    /// map itself is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        lock_entries(&self.entries)
    }

    /// Fresh value for `key`, evicting the entry if it has expired.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = {
            let mut entries = self.lock();
            if entries.get(key)?.is_expired_at(Utc::now()) {
                entries.remove(key);
                return None;
            }
            entries.get(key)?.data.clone()
        };
        decode(key, value)
    }

    /// Fresh value for `key` without touching expired entries.
    fn fresh<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = {
            let entries = self.lock();
            let entry = entries.get(key)?;
            if entry.is_expired_at(Utc::now()) {
                return None;
            }
            entry.data.clone()
        };
        decode(key, value)
    }

    /// Whatever is stored under `key`, expired or not.
    fn stale<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lock().get(key)?.data.clone();
        decode(key, value)
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: impl Into<String>, data: &T, ttl: Duration) {
        let key = key.into();
        match serde_json::to_value(data) {
            Ok(value) => {
                self.lock().insert(key, CacheEntry::new(value, ttl));
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to serialize value, not caching"),
        }
    }

    /// Human-readable age of the entry under `key`, e.g. `"3m ago"`.
    pub fn age_display(&self, key: &str) -> Option<String> {
        let created_at = self.lock().get(key)?.created_at;
        Some(format_age((Utc::now() - created_at).num_minutes()))
    }

    pub fn has(&self, key: &str) -> bool {
        self.get::<Value>(key).is_some()
    }

    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Remove every key matching the regular expression `pattern`.
    ///
    /// Returns the number of removed entries. An invalid pattern removes nothing.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                warn!(pattern, error = %e, "Invalid cache invalidation pattern");
                return 0;
            }
        };

        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !regex.is_match(key));
        let removed = before - entries.len();
        debug!(pattern, removed, "Invalidated cache entries");
        removed
    }

    /// Drop all expired entries. Returns how many were removed.
    pub fn clear_expired(&self) -> usize {
        remove_expired(&self.entries)
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let entries = self.lock();
        let expired = entries.values().filter(|e| e.is_expired_at(now)).count();
        CacheStats {
            total: entries.len(),
            valid: entries.len() - expired,
            expired,
        }
    }

    /// Read-through call.
    ///
    /// Returns the cached value for `(name, params)` when it is fresh and no
    /// refresh is forced. Otherwise runs `fetch` and caches its result. When
    /// `fetch` fails and an entry is still held for the key, that entry is
    /// returned as-is and its expiry is left untouched.
    pub async fn cached_call<P, T, E, F, Fut>(
        &self,
        name: &str,
        params: &P,
        options: CallOptions,
        fetch: F,
    ) -> Result<T, E>
    where
        P: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cached_call_with_status(name, params, options, fetch)
            .await
            .map(|cached| cached.data)
    }

    /// Same as [`cached_call`](Self::cached_call), but reports stale fallbacks.
    pub async fn cached_call_with_status<P, T, E, F, Fut>(
        &self,
        name: &str,
        params: &P,
        options: CallOptions,
        fetch: F,
    ) -> Result<Cached<T>, E>
    where
        P: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = Self::key(name, params);

        if !options.force_refresh {
            if let Some(data) = self.fresh::<T>(&key) {
                debug!(key = %key, "Cache hit");
                return Ok(Cached { data, stale: false });
            }
        }

        match fetch().await {
            Ok(data) => {
                self.set(key.as_str(), &data, options.ttl);
                Ok(Cached { data, stale: false })
            }
            Err(e) => match self.stale::<T>(&key) {
                Some(data) => {
                    warn!(key = %key, error = %e, "Fetch failed, returning stale data");
                    Ok(Cached { data, stale: true })
                }
                None => Err(e),
            },
        }
    }

    /// Fetch eagerly and populate the cache. Errors propagate.
    pub async fn preload<P, T, E, F, Fut>(
        &self,
        name: &str,
        params: &P,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, E>
    where
        P: Serialize + ?Sized,
        T: Serialize,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = Self::key(name, params);
        match fetch().await {
            Ok(data) => {
                self.set(key, &data, ttl);
                Ok(data)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to preload cache");
                Err(e)
            }
        }
    }

    /// Start a background task that drops expired entries every `interval`.
    ///
    /// The task ends on its own once every handle to this cache is dropped.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let entries = Arc::downgrade(&self.entries);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(entries) = entries.upgrade() else {
                    debug!("Cache dropped, stopping sweeper");
                    break;
                };
                let removed = remove_expired(&entries);
                if removed > 0 {
                    debug!(removed, "Swept expired cache entries");
                }
            }
        })
    }
}

fn lock_entries(entries: &Entries) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    entries.lock().unwrap_or_else(|poisoned| {
        warn!("Cache lock poisoned, recovering");
        poisoned.into_inner()
    })
}

fn remove_expired(entries: &Entries) -> usize {
    let now = Utc::now();
    let mut entries = lock_entries(entries);
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired_at(now));
    before - entries.len()
}

fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(data) => Some(data),
        Err(e) => {
            debug!(key, error = %e, "Cached value has unexpected shape, treating as miss");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
