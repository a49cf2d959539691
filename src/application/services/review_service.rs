//! Review creation service.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::entities::Review;
use crate::domain::repositories::ReviewRepository;
use crate::dto::ReviewInput;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Service for attaching reviews to products.
///
/// A new review changes the product's derived rating average, so every
/// successful write invalidates the product cache group.
pub struct ReviewService<R: ReviewRepository, C: CacheService + ?Sized> {
    review_repository: Arc<R>,
    cache: Arc<C>,
}

impl<R: ReviewRepository, C: CacheService + ?Sized> ReviewService<R, C> {
    /// Creates a new review service.
    pub fn new(review_repository: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            review_repository,
            cache,
        }
    }

    /// Creates a review for an existing product and invalidates the product
    /// cache group.
    ///
    /// The referenced product is not pre-validated; a dangling `product_id`
    /// surfaces as [`AppError::NotFound`] from the persistence layer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad input,
    /// [`AppError::NotFound`] for an unknown product,
    /// [`AppError::Internal`] on database errors.
    pub async fn create_review(&self, input: ReviewInput) -> Result<Review, AppError> {
        input.validated()?;

        let review = self
            .review_repository
            .create(input.into())
            .await
            .inspect_err(|e| error!("Failed to create review: {}", e))?;

        if let Err(e) = self.cache.invalidate_products().await {
            warn!("Cache invalidation failed: {}", e);
        }

        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    use crate::domain::repositories::MockReviewRepository;
    use crate::infrastructure::cache::MockCacheService;

    fn input(rating: i32) -> ReviewInput {
        ReviewInput {
            name: "Reviewer".to_string(),
            content: "Solid product".to_string(),
            rating,
            product_id: 7,
        }
    }

    fn review() -> Review {
        Review {
            id: 1,
            product_id: 7,
            name: "Reviewer".to_string(),
            content: "Solid product".to_string(),
            rating: 4,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_review_invalidates_product_cache() {
        let mut repo = MockReviewRepository::new();
        let created = review();
        repo.expect_create()
            .withf(|new_review| new_review.product_id == 7 && new_review.rating == 4)
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate_products()
            .times(1)
            .returning(|| Ok(()));

        let service = ReviewService::new(Arc::new(repo), Arc::new(cache));
        let result = service.create_review(input(4)).await.unwrap();

        assert_eq!(result.product_id, 7);
    }

    #[tokio::test]
    async fn test_create_review_rejects_off_scale_rating() {
        let mut repo = MockReviewRepository::new();
        repo.expect_create().times(0);

        let mut cache = MockCacheService::new();
        cache.expect_invalidate_products().times(0);

        let service = ReviewService::new(Arc::new(repo), Arc::new(cache));
        let result = service.create_review(input(6)).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_review_unknown_product_keeps_cache() {
        let mut repo = MockReviewRepository::new();
        repo.expect_create().times(1).returning(|_| {
            Err(AppError::not_found(
                "Product not found",
                json!({ "product_id": 7 }),
            ))
        });

        let mut cache = MockCacheService::new();
        cache.expect_invalidate_products().times(0);

        let service = ReviewService::new(Arc::new(repo), Arc::new(cache));
        let result = service.create_review(input(4)).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
