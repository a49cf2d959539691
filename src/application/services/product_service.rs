//! Product listing, lookup, and mutation service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::entities::ProductDetail;
use crate::domain::repositories::ProductRepository;
use crate::dto::{ProductInput, ProductQuery, ProductSummary};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Service for reading and mutating catalog products.
///
/// Reads go through an injected [`CacheService`] for the by-id lookup;
/// every mutation that changes what lookups should observe invalidates the
/// product cache group. Listing always reads the database directly.
pub struct ProductService<R: ProductRepository, C: CacheService + ?Sized> {
    product_repository: Arc<R>,
    cache: Arc<C>,
    cache_ttl_seconds: u64,
}

impl<R: ProductRepository, C: CacheService + ?Sized> ProductService<R, C> {
    /// Creates a new product service.
    ///
    /// `cache_ttl_seconds` bounds how long a cached record may be served
    /// after a missed invalidation.
    pub fn new(product_repository: Arc<R>, cache: Arc<C>, cache_ttl_seconds: u64) -> Self {
        Self {
            product_repository,
            cache,
            cache_ttl_seconds,
        }
    }

    /// Returns one page of products matching the query, with derived
    /// rating average and cover image per record.
    ///
    /// Pages hold [`crate::dto::PER_PAGE`] records and start at 1.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a zero page or non-numeric
    /// minimum price, [`AppError::Internal`] on database errors.
    pub async fn list_products(
        &self,
        query: ProductQuery,
    ) -> Result<Vec<ProductSummary>, AppError> {
        let (offset, limit) = query.offset_limit()?;
        let filter = query.filter()?;

        let details = self
            .product_repository
            .list(filter, offset, limit)
            .await
            .inspect_err(|e| error!("Failed to list products: {}", e))?;

        Ok(details.into_iter().map(ProductSummary::from).collect())
    }

    /// Retrieves a product with its images and reviews, serving from cache
    /// when a fresh entry exists.
    ///
    /// Cache reads and writes fail open: a cache error degrades to a
    /// database lookup. Not-found results are never cached.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(detail))` if found (possibly from cache)
    /// - `Ok(None)` if no product matches `id`
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_product(&self, id: i64) -> Result<Option<ProductDetail>, AppError> {
        match self.cache.get_product(id).await {
            Ok(Some(detail)) => {
                debug!("Serving product {} from cache", id);
                return Ok(Some(detail));
            }
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for product {}: {}", id, e),
        }

        let Some(detail) = self
            .product_repository
            .find_by_id(id)
            .await
            .inspect_err(|e| error!("Failed to load product {}: {}", id, e))?
        else {
            return Ok(None);
        };

        if let Err(e) = self
            .cache
            .set_product(detail.clone(), Some(self.cache_ttl_seconds))
            .await
        {
            warn!("Cache write failed for product {}: {}", id, e);
        }

        Ok(Some(detail))
    }

    /// Creates a product with its images in one atomic write.
    ///
    /// No cache invalidation happens here: entries are keyed per id and
    /// misses are not cached, so a fresh id cannot have a stale entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad input,
    /// [`AppError::Internal`] on database errors.
    pub async fn create_product(&self, input: ProductInput) -> Result<ProductDetail, AppError> {
        input.validated()?;

        self.product_repository
            .create(input.into_new_product())
            .await
            .inspect_err(|e| error!("Failed to create product: {}", e))
    }

    /// Overwrites a product's fields and replaces its image set, then
    /// invalidates the product cache group.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad input,
    /// [`AppError::NotFound`] for an unknown id, [`AppError::Internal`] on
    /// database errors.
    pub async fn update_product(
        &self,
        id: i64,
        input: ProductInput,
    ) -> Result<ProductDetail, AppError> {
        input.validated()?;

        let updated = self
            .product_repository
            .update(id, input.into_new_product())
            .await
            .inspect_err(|e| error!("Failed to update product {}: {}", id, e))?;

        let Some(detail) = updated else {
            return Err(AppError::not_found(
                "Product not found",
                json!({ "id": id }),
            ));
        };

        self.invalidate_cache().await;

        Ok(detail)
    }

    /// Deletes a product and invalidates the product cache group.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if a row was deleted, `Ok(false)` for an unknown id; the
    /// cache is only touched when a row was actually deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_product(&self, id: i64) -> Result<bool, AppError> {
        let deleted = self
            .product_repository
            .delete(id)
            .await
            .inspect_err(|e| error!("Failed to delete product {}: {}", id, e))?;

        if deleted {
            self.invalidate_cache().await;
        }

        Ok(deleted)
    }

    /// Marks every cached product record stale, logging instead of failing.
    async fn invalidate_cache(&self) {
        if let Err(e) = self.cache.invalidate_products().await {
            warn!("Cache invalidation failed: {}", e);
        }
    }
}
