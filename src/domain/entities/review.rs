//! Review entity attached to a product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer review of a product.
///
/// Reviews are append-only from this crate's point of view: they are
/// created independently of product writes and never updated or deleted
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub product_id: i64,
    pub name: String,
    pub content: String,
    pub rating: i32,
}
