//! PostgreSQL implementation of review repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewReview, Review};
use crate::domain::repositories::ReviewRepository;
use crate::error::{AppError, map_sqlx_error};
use crate::utils::db_error::is_foreign_key_violation_on_product;

/// PostgreSQL repository for review creation.
pub struct PgReviewRepository {
    pool: Arc<PgPool>,
}

impl PgReviewRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError> {
        let row: ReviewRow = sqlx::query_as(
            r#"
            INSERT INTO reviews (product_id, name, content, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, name, content, rating, created_at
            "#,
        )
        .bind(new_review.product_id)
        .bind(&new_review.name)
        .bind(&new_review.content)
        .bind(new_review.rating)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_foreign_key_violation_on_product(&e) {
                AppError::not_found(
                    "Product not found",
                    json!({ "product_id": new_review.product_id }),
                )
            } else {
                map_sqlx_error(e)
            }
        })?;

        Ok(row.into())
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    product_id: i64,
    name: String,
    content: String,
    rating: i32,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(r: ReviewRow) -> Self {
        Review {
            id: r.id,
            product_id: r.product_id,
            name: r.name,
            content: r.content,
            rating: r.rating,
            created_at: r.created_at,
        }
    }
}
