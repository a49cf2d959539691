//! Query parameters, inputs, and projections for product actions.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use url::Url;
use validator::Validate;

use crate::domain::entities::{Image, NewProduct, ProductDetail, ProductFilter, Review};
use crate::error::AppError;

/// Number of products per listing page.
pub const PER_PAGE: i64 = 5;

/// The category value meaning "do not filter by category".
pub const CATEGORY_ALL: &str = "all";

/// Listing query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
/// `min_price` stays string-encoded: it arrives that way from form/query
/// input and its parsing rule (whole units, fraction truncated) is part of
/// the listing contract.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub min_price: Option<String>,

    #[serde(default)]
    pub category: Option<String>,
}

impl ProductQuery {
    /// Validates the page number and converts it to database offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    ///
    /// # Returns
    ///
    /// `(offset, limit)` tuple for SQL queries; limit is always [`PER_PAGE`].
    pub fn offset_limit(&self) -> Result<(i64, i64), AppError> {
        let page = self.page.unwrap_or(1);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        let offset = (i64::from(page) - 1) * PER_PAGE;
        Ok((offset, PER_PAGE))
    }

    /// Builds the repository filter from the raw query values.
    ///
    /// - An absent or empty name means "match all".
    /// - The category sentinel [`CATEGORY_ALL`] disables the category filter.
    /// - `min_price` is parsed as a number and truncated to whole units
    ///   (`"10.9"` filters at 10); an empty string means no filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `min_price` is non-numeric.
    pub fn filter(&self) -> Result<ProductFilter, AppError> {
        let min_price = match self.min_price.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_min_price(raw)?),
        };

        Ok(ProductFilter {
            name: self.name.clone().filter(|n| !n.is_empty()),
            category: self.category.clone().filter(|c| c != CATEGORY_ALL),
            min_price,
        })
    }
}

/// Parses a string-encoded minimum price, truncating any fractional part.
fn parse_min_price(raw: &str) -> Result<i64, AppError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .ok_or_else(|| {
            AppError::bad_request("Minimum price must be numeric", json!({ "min_price": raw }))
        })
}

/// Input for creating or updating a product.
///
/// The same shape serves both operations: update overwrites every scalar
/// field and replaces the image set with `images`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub description: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    /// Ordered image URLs; the first becomes the cover image.
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductInput {
    /// Runs the declared field rules plus the image URL check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the offending field or URL.
    pub fn validated(&self) -> Result<(), AppError> {
        self.validate().map_err(crate::error::map_validation_error)?;
        validate_image_urls(&self.images)
    }

    /// Converts the input into the domain write model.
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_urls: self.images,
        }
    }
}

/// Checks that every image URL is syntactically valid.
fn validate_image_urls(urls: &[String]) -> Result<(), AppError> {
    for url in urls {
        if Url::parse(url).is_err() {
            return Err(AppError::bad_request(
                "Invalid image URL",
                json!({ "url": url }),
            ));
        }
    }
    Ok(())
}

/// A listing row: the full record plus the derived read-time fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub images: Vec<Image>,
    pub reviews: Vec<Review>,
    /// Floor of the mean review rating; 0 without reviews.
    pub avg_rating: i32,
    /// Cover image URL (first image), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<ProductDetail> for ProductSummary {
    fn from(detail: ProductDetail) -> Self {
        let avg_rating = detail.avg_rating();
        let image = detail.cover_image().map(str::to_owned);
        let ProductDetail {
            product,
            images,
            reviews,
        } = detail;

        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            images,
            reviews,
            avg_rating,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::entities::Product;

    fn query(
        page: Option<u32>,
        name: Option<&str>,
        min_price: Option<&str>,
        category: Option<&str>,
    ) -> ProductQuery {
        ProductQuery {
            page,
            name: name.map(str::to_owned),
            min_price: min_price.map(str::to_owned),
            category: category.map(str::to_owned),
        }
    }

    #[test]
    fn test_offset_defaults_to_first_page() {
        let (offset, limit) = query(None, None, None, None).offset_limit().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(limit, PER_PAGE);
    }

    #[test]
    fn test_offset_advances_by_page_size() {
        let (offset, _) = query(Some(3), None, None, None).offset_limit().unwrap();
        assert_eq!(offset, 10);
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(query(Some(0), None, None, None).offset_limit().is_err());
    }

    #[test]
    fn test_filter_category_all_is_no_filter() {
        let filter = query(None, None, None, Some("all")).filter().unwrap();
        assert_eq!(filter.category, None);

        let filter = query(None, None, None, Some("tools")).filter().unwrap();
        assert_eq!(filter.category.as_deref(), Some("tools"));

        let filter = query(None, None, None, None).filter().unwrap();
        assert_eq!(filter.category, None);
    }

    #[test]
    fn test_filter_empty_name_is_no_filter() {
        let filter = query(None, Some(""), None, None).filter().unwrap();
        assert_eq!(filter.name, None);

        let filter = query(None, Some("widget"), None, None).filter().unwrap();
        assert_eq!(filter.name.as_deref(), Some("widget"));
    }

    #[test]
    fn test_min_price_truncates_fraction() {
        let filter = query(None, None, Some("10.9"), None).filter().unwrap();
        assert_eq!(filter.min_price, Some(10));
    }

    #[test]
    fn test_min_price_empty_is_no_filter() {
        let filter = query(None, None, Some(""), None).filter().unwrap();
        assert_eq!(filter.min_price, None);
    }

    #[test]
    fn test_min_price_non_numeric_is_error() {
        assert!(query(None, None, Some("cheap"), None).filter().is_err());
    }

    #[test]
    fn test_query_parses_page_from_string() {
        let q: ProductQuery =
            serde_json::from_str(r#"{"page": "2", "category": "tools"}"#).unwrap();
        assert_eq!(q.page, Some(2));
        assert_eq!(q.category.as_deref(), Some("tools"));
    }

    fn input(price: f64, images: Vec<&str>) -> ProductInput {
        ProductInput {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price,
            category: "tools".to_string(),
            images: images.into_iter().map(str::to_owned).collect(),
        }
    }

    #[test]
    fn test_input_accepts_valid_product() {
        assert!(input(9.99, vec!["https://img.test/a.png"]).validated().is_ok());
    }

    #[test]
    fn test_input_rejects_negative_price() {
        assert!(input(-1.0, vec![]).validated().is_err());
    }

    #[test]
    fn test_input_rejects_empty_name() {
        let mut bad = input(1.0, vec![]);
        bad.name = String::new();
        assert!(bad.validated().is_err());
    }

    #[test]
    fn test_input_rejects_malformed_image_url() {
        assert!(input(1.0, vec!["not a url"]).validated().is_err());
    }

    #[test]
    fn test_summary_derives_rating_and_cover() {
        let detail = ProductDetail {
            product: Product::new(
                7,
                "Widget".to_string(),
                "A widget".to_string(),
                19.99,
                "tools".to_string(),
                Utc::now(),
            ),
            images: vec![
                Image {
                    id: 1,
                    product_id: 7,
                    url: "https://img.test/a.png".to_string(),
                },
                Image {
                    id: 2,
                    product_id: 7,
                    url: "https://img.test/b.png".to_string(),
                },
            ],
            reviews: vec![
                Review {
                    id: 1,
                    product_id: 7,
                    name: "A".to_string(),
                    content: "Good".to_string(),
                    rating: 5,
                    created_at: Utc::now(),
                },
                Review {
                    id: 2,
                    product_id: 7,
                    name: "B".to_string(),
                    content: "Okay".to_string(),
                    rating: 2,
                    created_at: Utc::now(),
                },
            ],
        };

        let summary = ProductSummary::from(detail);
        assert_eq!(summary.id, 7);
        assert_eq!(summary.avg_rating, 3);
        assert_eq!(summary.image.as_deref(), Some("https://img.test/a.png"));
        assert_eq!(summary.images.len(), 2);
        assert_eq!(summary.reviews.len(), 2);
    }

    #[test]
    fn test_summary_without_images_or_reviews() {
        let detail = ProductDetail {
            product: Product::new(
                1,
                "Bare".to_string(),
                String::new(),
                0.0,
                "misc".to_string(),
                Utc::now(),
            ),
            images: vec![],
            reviews: vec![],
        };

        let summary = ProductSummary::from(detail);
        assert_eq!(summary.avg_rating, 0);
        assert_eq!(summary.image, None);
    }
}
