//! Key/value cache seam and the in-memory reference implementation.
//!
//! The cache is injected and owned by the host; the engine only builds keys
//! and wraps computations. Keys are colon-joined
//! `(operation, SYMBOL-uppercased, params…)`. Expiry is lazy — checked on
//! read, never swept in the background. A write race lets the last
//! writer's value stand.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EngineError;

/// Host-owned cache contract. Values are JSON so the host can back this
/// with anything from a process map to an external store.
pub trait KvCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value, ttl_secs: u64);
}

/// Build the canonical cache key for an operation.
pub fn cache_key<I>(operation: &str, symbol: &str, params: I) -> String
where
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    let mut key = format!("{operation}:{}", symbol.to_uppercase());
    for param in params {
        let _ = write!(key, ":{param}");
    }
    key
}

/// Typed get-or-compute wrapper used by every engine operation.
///
/// A hit deserializes the stored payload and skips recomputation entirely;
/// an undeserializable hit (stale schema) is treated as a miss.
pub fn cached<T, F>(cache: &dyn KvCache, key: &str, ttl_secs: u64, compute: F) -> Result<T, EngineError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Result<T, EngineError>,
{
    if let Some(value) = cache.get(key) {
        match serde_json::from_value::<T>(value) {
            Ok(hit) => {
                debug!(key, "cache hit");
                return Ok(hit);
            }
            Err(err) => {
                warn!(key, %err, "cached payload failed to deserialize, recomputing");
            }
        }
    }

    let result = compute()?;
    match serde_json::to_value(&result) {
        Ok(value) => cache.set(key, value, ttl_secs),
        Err(err) => warn!(key, %err, "result not cacheable"),
    }
    Ok(result)
}

struct Entry {
    value: Value,
    inserted_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

/// Thread-safe in-memory cache with lazy TTL expiry.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries. Expired entries still resident
    /// are not counted.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        entries.values().filter(|e| !e.is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: Value, ttl_secs: u64) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value,
                inserted_at: Instant::now(),
                ttl: Duration::from_secs(ttl_secs),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_key_uppercases_symbol_and_joins_params() {
        assert_eq!(cache_key("ma", "spy", [200, 3]), "ma:SPY:200:3");
        assert_eq!(cache_key("mdd", "qqq", Vec::<u32>::new()), "mdd:QQQ");
    }

    #[test]
    fn set_then_get_roundtrips() {
        let cache = MemoryCache::new();
        cache.set("k", json!({"a": 1}), 60);
        assert_eq!(cache.get("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn expired_entry_is_removed_on_read() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1), 0);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn last_writer_wins() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1), 60);
        cache.set("k", json!(2), 60);
        assert_eq!(cache.get("k"), Some(json!(2)));
    }

    #[test]
    fn cached_skips_recomputation_on_hit() {
        let cache = MemoryCache::new();
        let mut calls = 0;
        let first: Vec<f64> = cached(&cache, "k", 60, || {
            calls += 1;
            Ok(vec![1.0, 2.0])
        })
        .unwrap();
        let second: Vec<f64> = cached(&cache, "k", 60, || {
            calls += 1;
            Ok(vec![9.0])
        })
        .unwrap();
        assert_eq!(first, second);
        assert_eq!(calls, 1);
    }
}
