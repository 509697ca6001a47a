//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

const KEY_PREFIX: &str = "alias:";

/// Redis cache of redirect targets.
///
/// Uses `ConnectionManager` for automatic reconnection. All operations are
/// fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` applies whenever [`CacheService::set_target`]
    /// is called without an explicit TTL (`CACHE_TTL_SECONDS`).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
        })
    }
}

fn build_key(alias: &str) -> String {
    format!("{KEY_PREFIX}{alias}")
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_target(&self, alias: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(build_key(alias)).await {
            Ok(Some(url)) => {
                debug!(alias = %alias, "Cache HIT");
                Ok(Some(url))
            }
            Ok(None) => {
                debug!(alias = %alias, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!(alias = %alias, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_target(
        &self,
        alias: &str,
        url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        if let Err(e) = conn.set_ex::<_, _, ()>(build_key(alias), url, ttl).await {
            warn!(alias = %alias, error = %e, "Redis SET failed");
        } else {
            debug!(alias = %alias, ttl, "Cache SET");
        }

        Ok(())
    }

    async fn invalidate(&self, alias: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(build_key(alias)).await {
            Ok(deleted) if deleted > 0 => debug!(alias = %alias, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(alias = %alias, error = %e, "Redis DEL failed"),
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
