//! Redis-backed cache adapter.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::time::timeout;
use tracing::info;

use crate::cache::CachePort;
use crate::error::{CacheError, CacheResult};

/// Namespace applied when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "sa:";

/// Redis connection settings.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Password; empty disables AUTH.
    pub password: String,
    /// Logical database index.
    pub db: i64,
    /// Namespace prepended to every key.
    pub key_prefix: String,
    /// Bound on connecting and the initial PING.
    pub connect_timeout: Duration,
    /// Bound on each GET/SET.
    pub op_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: String::new(),
            db: 0,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            connect_timeout: Duration::from_secs(5),
            op_timeout: Duration::from_secs(2),
        }
    }
}

impl RedisConfig {
    /// Connection URL in `redis://[:password@]host:port/db` form.
    pub fn url(&self) -> String {
        let auth = if self.password.is_empty() {
            String::new()
        } else {
            format!(":{}@", urlencoding::encode(&self.password))
        };
        format!("redis://{}{}:{}/{}", auth, self.host, self.port, self.db)
    }

    /// Key prefix, falling back to the default namespace when empty.
    pub fn effective_prefix(&self) -> &str {
        if self.key_prefix.is_empty() {
            DEFAULT_KEY_PREFIX
        } else {
            &self.key_prefix
        }
    }
}

/// Cache adapter over a shared Redis connection.
pub struct RedisCache {
    conn: ConnectionManager,
    prefix: String,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connect and PING, both within the configured connect timeout.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        let client = redis::Client::open(config.url())?;

        let mut conn = timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(config.connect_timeout))??;

        let pong: String = timeout(config.connect_timeout, redis::cmd("PING").query_async(&mut conn))
            .await
            .map_err(|_| CacheError::Timeout(config.connect_timeout))??;

        info!(
            host = %config.host,
            port = config.port,
            db = config.db,
            reply = %pong,
            "Redis connected"
        );

        Ok(Self {
            conn,
            prefix: config.effective_prefix().to_string(),
            op_timeout: config.op_timeout,
        })
    }

    /// Full key as stored in Redis.
    fn namespaced(&self, key: &str) -> String {
        namespaced_key(&self.prefix, key)
    }
}

fn namespaced_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

#[async_trait]
impl CachePort for RedisCache {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let key = self.namespaced(key);

        let value: Option<String> = timeout(self.op_timeout, conn.get(&key))
            .await
            .map_err(|_| CacheError::Timeout(self.op_timeout))??;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let key = self.namespaced(key);

        if ttl.is_zero() {
            let _: () = timeout(self.op_timeout, conn.set(&key, value))
                .await
                .map_err(|_| CacheError::Timeout(self.op_timeout))??;
        } else {
            let seconds = ttl.as_secs().max(1);
            let _: () = timeout(self.op_timeout, conn.set_ex(&key, value, seconds))
                .await
                .map_err(|_| CacheError::Timeout(self.op_timeout))??;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_password() {
        let config = RedisConfig::default();
        assert_eq!(config.url(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn test_url_with_password_and_db() {
        let config = RedisConfig {
            host: "cache.internal".to_string(),
            port: 6380,
            password: "p@ss word".to_string(),
            db: 3,
            ..Default::default()
        };
        assert_eq!(config.url(), "redis://:p%40ss%20word@cache.internal:6380/3");
    }

    #[test]
    fn test_prefix_defaults_when_empty() {
        let config = RedisConfig {
            key_prefix: String::new(),
            ..Default::default()
        };
        assert_eq!(config.effective_prefix(), "sa:");
        assert_eq!(namespaced_key(config.effective_prefix(), "fx:USD:ETB"), "sa:fx:USD:ETB");
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = RedisConfig {
            port,
            connect_timeout: Duration::from_millis(500),
            ..Default::default()
        };

        assert!(RedisCache::connect(&config).await.is_err());
    }

    /// Requires a Redis server on 127.0.0.1:6379.
    #[tokio::test]
    #[ignore]
    async fn test_round_trip_against_live_server() {
        let config = RedisConfig {
            key_prefix: "fxgate-test:".to_string(),
            ..Default::default()
        };
        let cache = RedisCache::connect(&config).await.unwrap();

        cache.set("foo", "bar", Duration::from_secs(10)).await.unwrap();
        assert_eq!(cache.get("foo").await.unwrap(), Some("bar".to_string()));
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }
}
