//! Cache-aside rate resolution.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fxgate_common::{format_rate, parse_rate, CurrencyPair};
use tracing::{debug, instrument, warn};

use crate::cache::{CachePort, NoCache};
use crate::error::{FxError, FxResult};
use crate::metrics::ResolverMetrics;
use crate::provider::RateProvider;

/// Key prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "fx:";

/// Configuration for the cached resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// TTL attached to every write-back.
    pub ttl: Duration,
    /// Prefix of every cache key; empty means `fx:`.
    pub key_prefix: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// Cache key for a canonical pair, e.g. `fx:USD:ETB`.
pub fn cache_key(prefix: &str, pair: &CurrencyPair) -> String {
    let prefix = if prefix.is_empty() {
        DEFAULT_KEY_PREFIX
    } else {
        prefix
    };
    format!("{prefix}{pair}")
}

/// Resolves rates from a cache, falling back to a provider and writing back.
///
/// The cache is an optimization only: lookup failures, misses, and unparseable
/// entries all fall through to the provider, and write-back failures are
/// logged and dropped. A corrupt entry is overwritten on the next miss.
pub struct CachedRateResolver {
    provider: Arc<dyn RateProvider>,
    cache: Arc<dyn CachePort>,
    config: ResolverConfig,
    metrics: ResolverMetrics,
}

impl CachedRateResolver {
    /// Create a resolver over a provider and a cache.
    pub fn new(
        provider: Arc<dyn RateProvider>,
        cache: Arc<dyn CachePort>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
            metrics: ResolverMetrics::new(),
        }
    }

    /// Create a resolver that always goes to the provider.
    pub fn without_cache(provider: Arc<dyn RateProvider>, config: ResolverConfig) -> Self {
        Self::new(provider, Arc::new(NoCache), config)
    }

    /// Name of the configured cache adapter.
    pub fn cache_name(&self) -> &str {
        self.cache.name()
    }

    /// Resolution counters.
    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    /// Cache key this resolver uses for `pair`.
    pub fn key_for(&self, pair: &CurrencyPair) -> String {
        cache_key(&self.config.key_prefix, pair)
    }

    /// Resolve a rate from raw currency codes.
    pub async fn get_rate(&self, from: &str, to: &str) -> FxResult<f64> {
        let pair = CurrencyPair::parse(from, to)?;
        self.resolve(&pair).await
    }

    /// Resolve a rate from raw codes, giving up once `deadline` has elapsed.
    pub async fn get_rate_with_deadline(
        &self,
        from: &str,
        to: &str,
        deadline: Duration,
    ) -> FxResult<f64> {
        let pair = CurrencyPair::parse(from, to)?;
        self.resolve_with_deadline(&pair, deadline).await
    }

    /// Resolve a rate for a canonical pair, giving up once `deadline` has elapsed.
    ///
    /// In-flight cache and provider calls are dropped when the deadline fires.
    pub async fn resolve_with_deadline(
        &self,
        pair: &CurrencyPair,
        deadline: Duration,
    ) -> FxResult<f64> {
        tokio::time::timeout(deadline, self.resolve(pair))
            .await
            .map_err(|_| FxError::Timeout(deadline))?
    }

    /// Resolve a rate for a canonical pair.
    #[instrument(skip(self, pair), fields(pair = %pair, cache = self.cache.name()))]
    pub async fn resolve(&self, pair: &CurrencyPair) -> FxResult<f64> {
        let cached = self.cache.is_enabled();
        let key = self.key_for(pair);

        if cached {
            if let Some(rate) = self.lookup(&key).await {
                debug!(rate, "Using cached rate");
                return Ok(rate);
            }
        }

        self.metrics.record_provider_call();
        let rate = match self.provider.fetch_rate(pair).await {
            Ok(rate) => rate,
            Err(e) => {
                self.metrics.record_provider_failure();
                warn!(provider = self.provider.name(), error = %e, "Provider failed to return rate");
                return Err(e);
            }
        };

        if cached {
            self.write_back(&key, rate).await;
        }

        Ok(rate)
    }

    /// Cached rate for `key`, or `None` when the provider must be asked.
    async fn lookup(&self, key: &str) -> Option<f64> {
        match self.cache.get(key).await {
            Ok(Some(value)) => match parse_rate(&value) {
                Some(rate) => {
                    self.metrics.record_cache_hit();
                    Some(rate)
                }
                None => {
                    self.metrics.record_cache_corrupt();
                    warn!(key, value = %value, "Discarding unparseable cached rate");
                    None
                }
            },
            Ok(None) => {
                self.metrics.record_cache_miss();
                debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                self.metrics.record_cache_error();
                warn!(key, error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    async fn write_back(&self, key: &str, rate: f64) {
        let value = format_rate(rate);
        // Rates too small for the text form would read back as corrupt.
        if parse_rate(&value).is_none() {
            debug!(key, rate, "Rate not representable in cache, skipping write-back");
            return;
        }

        match self.cache.set(key, &value, self.config.ttl).await {
            Ok(()) => self.metrics.record_cache_write(),
            Err(e) => {
                self.metrics.record_cache_write_failure();
                warn!(key, error = %e, "Cache write-back failed");
            }
        }
    }
}

#[async_trait]
impl RateProvider for CachedRateResolver {
    fn name(&self) -> &str {
        "cached"
    }

    async fn fetch_rate(&self, pair: &CurrencyPair) -> FxResult<f64> {
        self.resolve(pair).await
    }
}
