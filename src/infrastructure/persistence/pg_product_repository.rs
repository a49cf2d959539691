//! PostgreSQL implementation of product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Image, NewProduct, Product, ProductDetail, ProductFilter, Review};
use crate::domain::repositories::ProductRepository;
use crate::error::AppError;

/// PostgreSQL repository for product storage and retrieval.
///
/// Uses runtime-bound SQLx queries with positional parameters for SQL
/// injection protection. Multi-statement writes (create-with-images,
/// update-with-image-replacement) run inside a transaction.
pub struct PgProductRepository {
    pool: Arc<PgPool>,
}

impl PgProductRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Loads images for the given product ids, grouped by product.
    ///
    /// Rows come back ordered by insertion id, so the first image per
    /// product is the cover image.
    async fn images_for(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Image>>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<ImageRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, url
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut grouped: HashMap<i64, Vec<Image>> = HashMap::new();
        for row in rows {
            grouped.entry(row.product_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    /// Loads reviews for the given product ids, grouped by product.
    async fn reviews_for(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<Review>>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<ReviewRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, name, content, rating, created_at
            FROM reviews
            WHERE product_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut grouped: HashMap<i64, Vec<Review>> = HashMap::new();
        for row in rows {
            grouped.entry(row.product_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, new_product: NewProduct) -> Result<ProductDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: ProductRow = sqlx::query_as(
            r#"
            INSERT INTO products (name, description, price, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, category, created_at
            "#,
        )
        .bind(&new_product.name)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(&new_product.category)
        .fetch_one(&mut *tx)
        .await?;

        let mut images = Vec::with_capacity(new_product.image_urls.len());
        for url in &new_product.image_urls {
            let image: ImageRow = sqlx::query_as(
                r#"
                INSERT INTO product_images (product_id, url)
                VALUES ($1, $2)
                RETURNING id, product_id, url
                "#,
            )
            .bind(row.id)
            .bind(url)
            .fetch_one(&mut *tx)
            .await?;
            images.push(image.into());
        }

        tx.commit().await?;

        Ok(ProductDetail {
            product: row.into(),
            images,
            reviews: Vec::new(),
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ProductDetail>, AppError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price, category, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut images = self.images_for(&[id]).await?;
        let mut reviews = self.reviews_for(&[id]).await?;

        Ok(Some(ProductDetail {
            product: row.into(),
            images: images.remove(&id).unwrap_or_default(),
            reviews: reviews.remove(&id).unwrap_or_default(),
        }))
    }

    async fn list(
        &self,
        filter: ProductFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ProductDetail>, AppError> {
        let name_pattern = filter.name.as_deref().map(escape_like);

        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price, category, created_at
            FROM products
            WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%' ESCAPE '\')
              AND ($2::text IS NULL OR category = $2)
              AND ($3::bigint IS NULL OR price >= $3)
            ORDER BY id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(name_pattern)
        .bind(filter.category)
        .bind(filter.min_price)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut images = self.images_for(&ids).await?;
        let mut reviews = self.reviews_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                ProductDetail {
                    product: row.into(),
                    images: images.remove(&id).unwrap_or_default(),
                    reviews: reviews.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        new_product: NewProduct,
    ) -> Result<Option<ProductDetail>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, category = $5
            WHERE id = $1
            RETURNING id, name, description, price, category, created_at
            "#,
        )
        .bind(id)
        .bind(&new_product.name)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(&new_product.category)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        // Wholesale replacement of the image set, not a diff.
        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let mut images = Vec::with_capacity(new_product.image_urls.len());
        for url in &new_product.image_urls {
            let image: ImageRow = sqlx::query_as(
                r#"
                INSERT INTO product_images (product_id, url)
                VALUES ($1, $2)
                RETURNING id, product_id, url
                "#,
            )
            .bind(id)
            .bind(url)
            .fetch_one(&mut *tx)
            .await?;
            images.push(image.into());
        }

        let reviews: Vec<ReviewRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, name, content, rating, created_at
            FROM reviews
            WHERE product_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ProductDetail {
            product: row.into(),
            images,
            reviews: reviews.into_iter().map(Into::into).collect(),
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    category: String,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product::new(
            r.id,
            r.name,
            r.description,
            r.price,
            r.category,
            r.created_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: i64,
    product_id: i64,
    url: String,
}

impl From<ImageRow> for Image {
    fn from(r: ImageRow) -> Self {
        Image {
            id: r.id,
            product_id: r.product_id,
            url: r.url,
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("widget"), "widget");
    }

    #[test]
    fn test_escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%_off"), "100\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
