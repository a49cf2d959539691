//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository
//! calls, validation, and cache invalidation. Services consume repository
//! traits and provide a clean API for host call sites.
//!
//! # Available Services
//!
//! - [`services::product_service::ProductService`] - Product listing, lookup, and mutations
//! - [`services::review_service::ReviewService`] - Review creation

pub mod services;
