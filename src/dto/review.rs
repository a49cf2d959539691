//! Input for review creation.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::NewReview;
use crate::error::AppError;

/// Input for creating a review on an existing product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 2000))]
    pub content: String,

    /// Star rating on a 1-5 scale.
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    pub product_id: i64,
}

impl ReviewInput {
    /// Runs the declared field rules.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming the offending field.
    pub fn validated(&self) -> Result<(), AppError> {
        self.validate().map_err(crate::error::map_validation_error)
    }
}

impl From<ReviewInput> for NewReview {
    fn from(input: ReviewInput) -> Self {
        NewReview {
            product_id: input.product_id,
            name: input.name,
            content: input.content,
            rating: input.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(rating: i32) -> ReviewInput {
        ReviewInput {
            name: "Reviewer".to_string(),
            content: "Solid product".to_string(),
            rating,
            product_id: 1,
        }
    }

    #[test]
    fn test_accepts_ratings_in_scale() {
        assert!(input(1).validated().is_ok());
        assert!(input(5).validated().is_ok());
    }

    #[test]
    fn test_rejects_ratings_off_scale() {
        assert!(input(0).validated().is_err());
        assert!(input(6).validated().is_err());
    }

    #[test]
    fn test_rejects_empty_content() {
        let mut bad = input(4);
        bad.content = String::new();
        assert!(bad.validated().is_err());
    }
}
