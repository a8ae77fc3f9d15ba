//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use fxgate_fx::{CachePort, CachedRateResolver, RateProvider};

use crate::config::ServerConfig;

/// State shared by all request handlers.
pub struct AppState {
    /// Cache-aside resolver.
    pub resolver: CachedRateResolver,
    /// Deadline for one `/fx` request.
    pub request_timeout: Duration,
}

impl AppState {
    /// Wire a resolver from its collaborators.
    pub fn new(
        provider: Arc<dyn RateProvider>,
        cache: Arc<dyn CachePort>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            resolver: CachedRateResolver::new(provider, cache, config.resolver_config()),
            request_timeout: config.request_timeout,
        }
    }
}
