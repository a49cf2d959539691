//! Product entity and its read-time aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Image, Review};

/// A catalog product.
///
/// `price` is non-negative; `category` is a free-form label (the set of
/// categories is open-ended and not enforced here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new Product instance.
    pub fn new(
        id: i64,
        name: String,
        description: String,
        price: f64,
        category: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            price,
            category,
            created_at,
        }
    }
}

/// Input data for creating or replacing a product.
///
/// `image_urls` is ordered; the first URL becomes the cover image.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_urls: Vec<String>,
}

/// Filter criteria for product listings.
///
/// `None` fields apply no restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    pub category: Option<String>,
    /// Lower bound on price, whole units.
    pub min_price: Option<i64>,
}

/// A product together with its images and reviews.
///
/// This is the shape cached per id and returned by lookups; the rating
/// average and cover image are derived on access, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub images: Vec<Image>,
    pub reviews: Vec<Review>,
}

impl ProductDetail {
    /// Floor of the mean review rating; 0 when the product has no reviews.
    pub fn avg_rating(&self) -> i32 {
        if self.reviews.is_empty() {
            return 0;
        }

        let sum: i64 = self.reviews.iter().map(|r| i64::from(r.rating)).sum();
        (sum / self.reviews.len() as i64) as i32
    }

    /// URL of the first image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new(
            1,
            "Widget".to_string(),
            "A widget".to_string(),
            19.99,
            "tools".to_string(),
            Utc::now(),
        )
    }

    fn review(rating: i32) -> Review {
        Review {
            id: 1,
            product_id: 1,
            name: "Reviewer".to_string(),
            content: "Fine".to_string(),
            rating,
            created_at: Utc::now(),
        }
    }

    fn image(id: i64, url: &str) -> Image {
        Image {
            id,
            product_id: 1,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_avg_rating_zero_without_reviews() {
        let detail = ProductDetail {
            product: product(),
            images: vec![],
            reviews: vec![],
        };
        assert_eq!(detail.avg_rating(), 0);
    }

    #[test]
    fn test_avg_rating_floors_the_mean() {
        // (5 + 4 + 4) / 3 = 4.33 -> 4
        let detail = ProductDetail {
            product: product(),
            images: vec![],
            reviews: vec![review(5), review(4), review(4)],
        };
        assert_eq!(detail.avg_rating(), 4);

        // (5 + 2) / 2 = 3.5 -> 3
        let detail = ProductDetail {
            product: product(),
            images: vec![],
            reviews: vec![review(5), review(2)],
        };
        assert_eq!(detail.avg_rating(), 3);
    }

    #[test]
    fn test_avg_rating_exact_mean() {
        let detail = ProductDetail {
            product: product(),
            images: vec![],
            reviews: vec![review(4), review(4)],
        };
        assert_eq!(detail.avg_rating(), 4);
    }

    #[test]
    fn test_cover_image_is_first() {
        let detail = ProductDetail {
            product: product(),
            images: vec![image(1, "https://img.test/a.png"), image(2, "https://img.test/b.png")],
            reviews: vec![],
        };
        assert_eq!(detail.cover_image(), Some("https://img.test/a.png"));
    }

    #[test]
    fn test_cover_image_absent_without_images() {
        let detail = ProductDetail {
            product: product(),
            images: vec![],
            reviews: vec![],
        };
        assert!(detail.cover_image().is_none());
    }
}
