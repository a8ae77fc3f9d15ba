//! Service configuration.

use std::str::FromStr;
use std::time::Duration;

use fxgate_fx::{HttpProviderConfig, RedisConfig, ResolverConfig};

/// Which cache adapter backs the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CacheBackend {
    /// Shared Redis store.
    Redis,
    /// In-process map, lost on restart.
    Memory,
    /// No caching; every request reaches the provider.
    None,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            "none" => Ok(CacheBackend::None),
            other => Err(format!("unknown cache backend: {other}")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Main service configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Prefix under which routes are mounted; empty mounts at the root.
    pub base_path: String,
    /// Deadline for resolving one request.
    pub request_timeout: Duration,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Cache adapter.
    pub cache_backend: CacheBackend,
    /// Redis settings, used when the backend is Redis.
    pub redis: RedisConfig,
    /// Rate provider settings.
    pub provider: HttpProviderConfig,
    /// TTL of cached rates.
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: String::new(),
            request_timeout: Duration::from_secs(20),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            cache_backend: CacheBackend::Redis,
            redis: RedisConfig::default(),
            provider: HttpProviderConfig::default(),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup. Unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("SERVER_HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("SERVER_PORT") {
            if let Ok(port) = port.trim().trim_start_matches(':').parse() {
                config.port = port;
            }
        }

        if let Some(path) = lookup("API_BASE_PATH") {
            config.base_path = path.trim().to_string();
        }

        if let Some(ms) = parse_number(&lookup, "REQUEST_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(ms);
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(Ok(format)) = lookup("LOG_FORMAT").map(|f| f.parse::<LogFormat>()) {
            config.log_format = format;
        }

        if let Some(Ok(backend)) = lookup("CACHE_BACKEND").map(|b| b.parse::<CacheBackend>()) {
            config.cache_backend = backend;
        }

        if let Some(host) = lookup("REDIS_HOST") {
            config.redis.host = host;
        }

        if let Some(port) = parse_number(&lookup, "REDIS_PORT") {
            config.redis.port = port;
        }

        if let Some(password) = lookup("REDIS_PASSWORD") {
            config.redis.password = password;
        }

        if let Some(db) = parse_number(&lookup, "REDIS_DB") {
            config.redis.db = db;
        }

        if let Some(prefix) = lookup("REDIS_KEY_PREFIX") {
            config.redis.key_prefix = prefix;
        }

        if let Some(ms) = parse_number(&lookup, "REDIS_CONNECT_TIMEOUT_MS") {
            config.redis.connect_timeout = Duration::from_millis(ms);
        }

        if let Some(ms) = parse_number(&lookup, "REDIS_OP_TIMEOUT_MS") {
            config.redis.op_timeout = Duration::from_millis(ms);
        }

        if let Some(url) = lookup("FX_API_URL") {
            config.provider.api_url = url.trim().to_string();
        }

        if let Some(key) = lookup("FX_API_KEY") {
            config.provider.api_key = key.trim().to_string();
        }

        if let Some(secs) = parse_number(&lookup, "FX_CACHE_TTL_SECONDS") {
            config.cache_ttl = Duration::from_secs(secs);
        }

        if let Some(ms) = parse_number(&lookup, "FX_HTTP_TIMEOUT_MS") {
            config.provider.timeout = Duration::from_millis(ms);
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.cache_ttl.is_zero() {
            return Err("Cache TTL must be positive".to_string());
        }

        if self.request_timeout.is_zero() || self.provider.timeout.is_zero() {
            return Err("Request and provider timeouts must be positive".to_string());
        }

        if self.cache_backend == CacheBackend::Redis
            && (self.redis.connect_timeout.is_zero() || self.redis.op_timeout.is_zero())
        {
            return Err("Redis timeouts must be positive".to_string());
        }

        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(format!("Base path must start with '/': {}", self.base_path));
        }

        Ok(())
    }

    /// Address to bind, `host:port`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolver settings derived from this configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            ttl: self.cache_ttl,
            ..ResolverConfig::default()
        }
    }
}

fn parse_number<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
