//! Business logic services for the application layer.

pub mod product_service;
pub mod review_service;

pub use product_service::ProductService;
pub use review_service::ReviewService;
