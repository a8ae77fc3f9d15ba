//! fxgate FX resolver
//!
//! Cache-aside resolution of foreign exchange rates.
//!
//! # Features
//!
//! - HTTP rate provider that understands several public FX API shapes
//! - Pluggable cache port with Redis, in-memory, and no-op adapters
//! - Cached resolver with read-repair of corrupt entries and best-effort write-back
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fxgate_fx::{CachedRateResolver, HttpProviderConfig, HttpRateProvider, MemoryCache, ResolverConfig};
//!
//! let provider = HttpRateProvider::new(HttpProviderConfig::default())?;
//! let resolver = CachedRateResolver::new(
//!     Arc::new(provider),
//!     Arc::new(MemoryCache::new()),
//!     ResolverConfig::default(),
//! );
//!
//! let rate = resolver.get_rate("usd", "etb").await?;
//! ```

pub mod cache;
pub mod conversion;
pub mod endpoint;
pub mod error;
pub mod http_provider;
pub mod metrics;
pub mod provider;
pub mod redis_cache;
pub mod resolver;
pub mod response;

pub use cache::{CachePort, MemoryCache, MemoryCacheConfig, NoCache};
pub use conversion::{parse_amount, Conversion};
pub use error::{CacheError, CacheResult, FxError, FxResult};
pub use http_provider::{HttpProviderConfig, HttpRateProvider};
pub use metrics::{MetricsSnapshot, ResolverMetrics};
pub use provider::RateProvider;
pub use redis_cache::{RedisCache, RedisConfig};
pub use resolver::{CachedRateResolver, ResolverConfig};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
