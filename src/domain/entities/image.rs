//! Image entity owned by a product.

use serde::{Deserialize, Serialize};

/// A product image.
///
/// Images belong to exactly one product and are only ever created or
/// replaced through product create/update; there is no standalone image
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
}
