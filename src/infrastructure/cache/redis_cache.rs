//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

use crate::domain::entities::ProductDetail;

/// Set tracking every live product cache key, enabling group invalidation.
const TAG_SET_KEY: &str = "tag:products";

/// Redis cache implementation for product lookups.
///
/// Records are stored as JSON under `product:{id}` with a TTL, and each key
/// is added to a tag set; invalidation deletes every member of the set.
/// Uses connection pooling via `ConnectionManager` for efficient connection
/// reuse. All operations are fail-open: errors are logged but don't
/// propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied to cached entries when [`CacheService::set_product`]
    ///   is called with `ttl_seconds = None`; controlled via `CACHE_TTL_SECONDS` env var
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

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
            key_prefix: "product:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, id: i64) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_product(&self, id: i64) -> CacheResult<Option<ProductDetail>> {
        let key = self.build_key(id);
        let mut conn = self.client.clone();

        let raw = match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                return Ok(None);
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<ProductDetail>(&raw) {
            Ok(detail) => {
                debug!("Cache HIT: {}", key);
                Ok(Some(detail))
            }
            Err(e) => {
                // A payload we can't decode is as good as absent.
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set_product(
        &self,
        detail: ProductDetail,
        ttl: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(detail.product.id);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.unwrap_or(self.default_ttl);

        let payload = match serde_json::to_string(&detail) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode cache entry {}: {}", key, e);
                return Ok(());
            }
        };

        match conn.set_ex::<_, _, ()>(&key, payload, ttl_seconds).await {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", key, ttl_seconds);
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                return Ok(());
            }
        }

        if let Err(e) = conn.sadd::<_, _, ()>(TAG_SET_KEY, &key).await {
            warn!("Redis SADD error for {}: {}", key, e);
        }

        Ok(())
    }

    async fn invalidate_products(&self) -> CacheResult<()> {
        let mut conn = self.client.clone();

        let keys = match conn.smembers::<_, Vec<String>>(TAG_SET_KEY).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Redis SMEMBERS error for {}: {}", TAG_SET_KEY, e);
                return Ok(());
            }
        };

        if !keys.is_empty() {
            match conn.del::<_, i64>(&keys).await {
                Ok(deleted) => debug!("Cache INVALIDATE: {} entries", deleted),
                Err(e) => warn!("Redis DEL error while invalidating products: {}", e),
            }
        }

        if let Err(e) = conn.del::<_, i64>(TAG_SET_KEY).await {
            warn!("Redis DEL error for {}: {}", TAG_SET_KEY, e);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
