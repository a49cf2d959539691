//! Repository trait for review data access.

use crate::domain::entities::{NewReview, Review};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for creating reviews.
///
/// Reviews reference an existing product; referential integrity is enforced
/// by the database, not pre-validated here.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReviewRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Creates a new review linked to `new_review.product_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the referenced product does not
    /// exist, [`AppError::Internal`] on other database errors.
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError>;
}
