//! Key-value cache port and in-process adapters.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::error::CacheResult;

/// Get/set-with-TTL store used by the resolver.
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Adapter name, for logs and health output.
    fn name(&self) -> &str;

    /// Whether lookups can ever hit. The resolver skips disabled caches.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Look up a key. `Ok(None)` means not found.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a value. A zero `ttl` means the entry never expires.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;
}

/// The absent cache: every lookup misses and every write is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl CachePort for NoCache {
    fn name(&self) -> &str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }
}

/// Cached value with optional expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn new(value: String, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            chrono::Duration::from_std(ttl)
                .ok()
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        };
        Self { value, expires_at }
    }

    fn is_valid(&self) -> bool {
        self.expires_at.map_or(true, |at| Utc::now() < at)
    }
}

/// Configuration for the in-process cache.
#[derive(Debug, Clone)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries before expired ones are evicted.
    pub max_entries: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self { max_entries: 10000 }
    }
}

/// Thread-safe in-process cache with per-entry TTL.
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    config: MemoryCacheConfig,
}

impl MemoryCache {
    /// Create a new memory cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryCacheConfig::default())
    }

    /// Create a new memory cache with custom configuration.
    pub fn with_config(config: MemoryCacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    /// Get the number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Evict expired entries.
    pub fn evict_expired(&self) {
        self.entries.retain(|_, entry| entry.is_valid());
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CachePort for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_valid() {
                return Ok(Some(entry.value.clone()));
            }
            debug!(key, "Cache entry expired");
            drop(entry);
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        if self.entries.len() >= self.config.max_entries && !self.entries.contains_key(key) {
            self.evict_expired();
        }
        self.entries
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        Ok(())
    }
}
