//! Repository trait for product data access.

use crate::domain::entities::{NewProduct, ProductDetail, ProductFilter};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing products and their images.
///
/// Images are owned by the product: `create` inserts one image row per URL
/// alongside the product, and `update` replaces the image set wholesale.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProductRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Creates a new product together with its image rows, atomically.
    ///
    /// The returned record carries the freshly created images and an empty
    /// review collection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_product: NewProduct) -> Result<ProductDetail, AppError>;

    /// Finds a product by id, including its images and reviews.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ProductDetail))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ProductDetail>, AppError>;

    /// Lists products matching `filter`, with their images and reviews.
    ///
    /// Results are ordered by id ascending so that offset pagination is
    /// stable across calls.
    ///
    /// # Arguments
    ///
    /// - `filter` - Name / category / minimum-price restrictions
    /// - `offset` - Number of matching rows to skip
    /// - `limit` - Maximum number of rows to return
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(
        &self,
        filter: ProductFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ProductDetail>, AppError>;

    /// Overwrites a product's scalar fields and replaces its image set
    /// with the provided URLs (delete all, then insert), atomically.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ProductDetail))` with the updated record
    /// - `Ok(None)` if no product matches `id`
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, new_product: NewProduct)
    -> Result<Option<ProductDetail>, AppError>;

    /// Deletes a product row.
    ///
    /// Child rows follow the schema's cascade rules. Returns `Ok(true)` if a
    /// row was deleted, `Ok(false)` if no product matches `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
