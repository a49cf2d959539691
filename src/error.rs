use serde_json::{Value, json};
use std::fmt;

/// Application error with a structured details payload.
///
/// Every fallible action returns this type so callers can tell an empty
/// result apart from a failed one and react per variant (reject input,
/// report missing rows, retry internal failures).
#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    NotFound { message: String, details: Value },
    Conflict { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { message, .. } => write!(f, "validation error: {}", message),
            Self::NotFound { message, .. } => write!(f, "not found: {}", message),
            Self::Conflict { message, .. } => write!(f, "conflict: {}", message),
            Self::Internal { message, .. } => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for AppError {}

/// Classifies a database error into an [`AppError`].
///
/// Unique and foreign-key violations become [`AppError::Conflict`] with the
/// constraint name attached; anything else is an opaque
/// [`AppError::Internal`].
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }
        if db.is_foreign_key_violation() {
            return AppError::conflict(
                "Foreign key constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }
    }

    AppError::internal("Database error", json!({}))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Converts `validator` failures into [`AppError::Validation`] with the
/// per-field messages as details.
pub fn map_validation_error(e: validator::ValidationErrors) -> AppError {
    let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
    AppError::bad_request("Invalid input", details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_display_includes_message() {
        let e = AppError::not_found("Product not found", json!({ "id": 7 }));
        assert_eq!(e.to_string(), "not found: Product not found");
    }

    #[test]
    fn test_helpers_build_matching_variants() {
        assert!(matches!(
            AppError::bad_request("x", json!({})),
            AppError::Validation { .. }
        ));
        assert!(matches!(
            AppError::conflict("x", json!({})),
            AppError::Conflict { .. }
        ));
        assert!(matches!(
            AppError::internal("x", json!({})),
            AppError::Internal { .. }
        ));
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = 1, max = 5))]
        rating: i32,
    }

    #[test]
    fn test_map_validation_error_carries_field_details() {
        let err = Probe { rating: 9 }.validate().unwrap_err();
        let mapped = map_validation_error(err);
        match mapped {
            AppError::Validation { details, .. } => {
                assert!(details.get("rating").is_some());
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}
