//! Resolver counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters describing how rates were resolved.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    /// Lookups answered from the cache.
    cache_hits: AtomicU64,
    /// Lookups that found nothing.
    cache_misses: AtomicU64,
    /// Lookups that failed in the cache adapter.
    cache_errors: AtomicU64,
    /// Cached values that failed to parse.
    cache_corrupt: AtomicU64,
    /// Calls made to the rate provider.
    provider_calls: AtomicU64,
    /// Provider calls that failed.
    provider_failures: AtomicU64,
    /// Successful write-backs.
    cache_writes: AtomicU64,
    /// Write-backs that failed.
    cache_write_failures: AtomicU64,
}

impl ResolverMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup answered from the cache.
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that found nothing.
    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup the cache adapter failed to answer.
    pub fn record_cache_error(&self) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cached value that failed to parse.
    pub fn record_cache_corrupt(&self) {
        self.cache_corrupt.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call to the rate provider.
    pub fn record_provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed provider call.
    pub fn record_provider_failure(&self) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful write-back.
    pub fn record_cache_write(&self) {
        self.cache_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed write-back.
    pub fn record_cache_write_failure(&self) {
        self.cache_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
            cache_corrupt: self.cache_corrupt.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            provider_failures: self.provider_failures.load(Ordering::Relaxed),
            cache_writes: self.cache_writes.load(Ordering::Relaxed),
            cache_write_failures: self.cache_write_failures.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let counters = [
            ("cache_hits", "Rate lookups answered from cache", snapshot.cache_hits),
            ("cache_misses", "Rate lookups not found in cache", snapshot.cache_misses),
            ("cache_errors", "Cache lookups that failed", snapshot.cache_errors),
            ("cache_corrupt", "Cached rates that failed to parse", snapshot.cache_corrupt),
            ("provider_calls", "Calls to the rate provider", snapshot.provider_calls),
            ("provider_failures", "Failed rate provider calls", snapshot.provider_failures),
            ("cache_writes", "Rates written back to cache", snapshot.cache_writes),
            ("cache_write_failures", "Failed cache write-backs", snapshot.cache_write_failures),
        ];

        let mut out = String::new();
        for (name, help, value) in counters {
            out.push_str(&format!(
                "# HELP fxgate_{name}_total {help}\n# TYPE fxgate_{name}_total counter\nfxgate_{name}_total {value}\n\n"
            ));
        }
        out
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_errors: u64,
    pub cache_corrupt: u64,
    pub provider_calls: u64,
    pub provider_failures: u64,
    pub cache_writes: u64,
    pub cache_write_failures: u64,
}
