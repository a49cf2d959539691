//! CLI administration tool for the product catalog.
//!
//! Provides commands for seeding and inspecting catalog data without
//! requiring a host application.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema migrations
//! cargo run --bin admin -- db migrate
//!
//! # List the first page of products
//! cargo run --bin admin -- product list
//!
//! # Filtered listing
//! cargo run --bin admin -- product list --page 2 --category tools --min-price 10
//!
//! # Create a product with images
//! cargo run --bin admin -- product create --name "Widget" --price 19.99 \
//!     --category tools --image https://img.test/a.png
//!
//! # Delete a product
//! cargo run --bin admin -- product delete 7
//!
//! # Attach a review
//! cargo run --bin admin -- review add --product-id 7 --rating 5
//!
//! # Check database and cache connectivity
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `REDIS_URL` (optional): enables the product cache

use catalog_actions::application::services::{ProductService, ReviewService};
use catalog_actions::config;
use catalog_actions::dto::{ProductInput, ProductQuery, ReviewInput};
use catalog_actions::infrastructure::cache::{CacheService, NullCache, RedisCache};
use catalog_actions::infrastructure::persistence::{
    PgProductRepository, PgReviewRepository, connect_pool, run_migrations,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// CLI tool for managing the product catalog.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Manage reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Product management subcommands.
#[derive(Subcommand)]
enum ProductAction {
    /// List one page of products
    List {
        /// 1-based page number
        #[arg(short, long)]
        page: Option<u32>,

        /// Case-insensitive name substring filter
        #[arg(short, long)]
        name: Option<String>,

        /// Category filter ("all" disables it)
        #[arg(short, long)]
        category: Option<String>,

        /// Minimum price in whole units
        #[arg(short, long)]
        min_price: Option<String>,
    },

    /// Show a single product (served from cache when fresh)
    Show {
        /// Product id
        id: i64,
    },

    /// Create a new product
    Create {
        /// Product name
        #[arg(short, long)]
        name: Option<String>,

        /// Product description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Price (non-negative)
        #[arg(short, long)]
        price: f64,

        /// Category label
        #[arg(short, long)]
        category: String,

        /// Image URL (repeatable; first becomes the cover)
        #[arg(short, long = "image")]
        images: Vec<String>,
    },

    /// Delete a product
    Delete {
        /// Product id
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Review management subcommands.
#[derive(Subcommand)]
enum ReviewAction {
    /// Attach a review to an existing product
    Add {
        /// Product id the review belongs to
        #[arg(short, long)]
        product_id: i64,

        /// Reviewer name
        #[arg(short, long)]
        name: Option<String>,

        /// Review text
        #[arg(short, long)]
        content: Option<String>,

        /// Star rating, 1-5
        #[arg(short, long)]
        rating: i32,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database and cache connectivity
    Check,

    /// Apply pending schema migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    if config.log_format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let pool = Arc::new(connect_pool(&config).await?);

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                eprintln!(
                    "{} {}",
                    "Failed to connect to Redis, caching disabled:".yellow(),
                    e
                );
                Arc::new(NullCache::new())
            }
        }
    } else {
        Arc::new(NullCache::new())
    };

    let products = ProductService::new(
        Arc::new(PgProductRepository::new(pool.clone())),
        cache.clone(),
        config.cache_ttl_seconds,
    );
    let reviews = ReviewService::new(Arc::new(PgReviewRepository::new(pool.clone())), cache.clone());

    match cli.command {
        Commands::Product { action } => match action {
            ProductAction::List {
                page,
                name,
                category,
                min_price,
            } => {
                let query = ProductQuery {
                    page,
                    name,
                    min_price,
                    category,
                };
                let items = products.list_products(query).await?;

                if items.is_empty() {
                    println!("{}", "No products found.".yellow());
                    return Ok(());
                }

                for item in items {
                    println!(
                        "{:>5}  {}  {}  {}  {} ({} reviews)",
                        item.id.to_string().cyan(),
                        item.name.bold(),
                        format!("{:.2}", item.price).green(),
                        item.category.dimmed(),
                        "★".repeat(item.avg_rating.max(0) as usize),
                        item.reviews.len()
                    );
                    if let Some(cover) = &item.image {
                        println!("       {}", cover.dimmed());
                    }
                }
            }

            ProductAction::Show { id } => match products.get_product(id).await? {
                Some(detail) => {
                    println!("{}  {}", detail.product.id.to_string().cyan(), detail.product.name.bold());
                    println!("  price:    {:.2}", detail.product.price);
                    println!("  category: {}", detail.product.category);
                    println!("  rating:   {} ({} reviews)", detail.avg_rating(), detail.reviews.len());
                    if !detail.product.description.is_empty() {
                        println!("  {}", detail.product.description);
                    }
                    for image in &detail.images {
                        println!("  image: {}", image.url.dimmed());
                    }
                }
                None => println!("{}", format!("Product {} not found.", id).yellow()),
            },

            ProductAction::Create {
                name,
                description,
                price,
                category,
                images,
            } => {
                let name = match name {
                    Some(name) => name,
                    None => Input::new().with_prompt("Product name").interact_text()?,
                };

                let created = products
                    .create_product(ProductInput {
                        name,
                        description,
                        price,
                        category,
                        images,
                    })
                    .await?;

                println!(
                    "{} Created product {} ({})",
                    "✓".green(),
                    created.product.id.to_string().cyan(),
                    created.product.name
                );
            }

            ProductAction::Delete { id, yes } => {
                if !yes {
                    let confirmed = Confirm::new()
                        .with_prompt(format!("Delete product {}?", id))
                        .default(false)
                        .interact()?;
                    if !confirmed {
                        println!("Aborted.");
                        return Ok(());
                    }
                }

                if products.delete_product(id).await? {
                    println!("{} Deleted product {}", "✓".green(), id);
                } else {
                    println!("{}", format!("Product {} not found.", id).yellow());
                }
            }
        },

        Commands::Review { action } => match action {
            ReviewAction::Add {
                product_id,
                name,
                content,
                rating,
            } => {
                let name = match name {
                    Some(name) => name,
                    None => Input::new().with_prompt("Reviewer name").interact_text()?,
                };
                let content = match content {
                    Some(content) => content,
                    None => Input::new().with_prompt("Review text").interact_text()?,
                };

                let review = reviews
                    .create_review(ReviewInput {
                        name,
                        content,
                        rating,
                        product_id,
                    })
                    .await?;

                println!(
                    "{} Added review {} to product {}",
                    "✓".green(),
                    review.id.to_string().cyan(),
                    review.product_id
                );
            }
        },

        Commands::Db { action } => match action {
            DbAction::Check => {
                sqlx::query("SELECT 1").execute(pool.as_ref()).await?;
                println!("{} Database connection OK", "✓".green());

                if config.is_cache_enabled() {
                    if cache.health_check().await {
                        println!("{} Cache connection OK", "✓".green());
                    } else {
                        println!("{}", "✗ Cache connection failed".red());
                    }
                } else {
                    println!("{}", "Cache disabled.".dimmed());
                }
            }

            DbAction::Migrate => {
                run_migrations(pool.as_ref()).await?;
                println!("{} Migrations applied", "✓".green());
            }
        },
    }

    Ok(())
}
