//! fxgate server
//!
//! HTTP front end for the cached FX rate resolver.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use std::sync::Arc;

use fxgate_fx::{
    CachePort, FxResult, HttpRateProvider, MemoryCache, NoCache, RedisCache,
};
use tracing::{info, warn};

pub use api::app_router;
pub use config::{CacheBackend, LogFormat, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Build the configured cache adapter.
///
/// An unreachable Redis is not fatal: the service runs uncached.
pub async fn build_cache(config: &ServerConfig) -> Arc<dyn CachePort> {
    match config.cache_backend {
        CacheBackend::None => Arc::new(NoCache),
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Redis => match RedisCache::connect(&config.redis).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                warn!(
                    host = %config.redis.host,
                    port = config.redis.port,
                    error = %e,
                    "Redis unavailable, continuing without cache"
                );
                Arc::new(NoCache)
            }
        },
    }
}

/// Build handler state from configuration.
pub async fn build_state(config: &ServerConfig) -> FxResult<Arc<AppState>> {
    let provider = HttpRateProvider::new(config.provider.clone())?;
    let cache = build_cache(config).await;

    info!(cache = cache.name(), ttl_secs = config.cache_ttl.as_secs(), "Resolver configured");

    Ok(Arc::new(AppState::new(Arc::new(provider), cache, config)))
}
