//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::ProductDetail;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching product records.
///
/// Entries are keyed per product id and grouped under a single tag so that
/// any mutation affecting product reads (update, delete, review creation)
/// can expire the whole group at once. Entries also expire on their own
/// after a TTL, so a missed invalidation only yields a bounded stale window.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures should degrade to database
/// lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached record for a product id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(detail))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    ///
    /// # Errors
    ///
    /// Should not return errors in production implementations. Errors are
    /// logged and treated as cache misses.
    async fn get_product(&self, id: i64) -> CacheResult<Option<ProductDetail>>;

    /// Stores a product record under its id and tags it for group
    /// invalidation.
    ///
    /// # Arguments
    ///
    /// - `detail` - The record to cache (keyed by `detail.product.id`)
    /// - `ttl_seconds` - Optional TTL in seconds (implementation-specific default if None)
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations should log
    /// errors and return `Ok(())` to avoid disrupting the request flow.
    async fn set_product(&self, detail: ProductDetail, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Marks every cached product record stale.
    ///
    /// Called after any mutation that changes what product reads should
    /// observe: product update or delete, and review creation (the rating
    /// average is derived from reviews).
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers.
    async fn invalidate_products(&self) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
