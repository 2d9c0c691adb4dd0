//! Catalog Domain
//!
//! CRUD and search over products and hierarchical categories, backed by
//! PostgreSQL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business rules, aggregated validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Entities   │  ← SeaORM entities, DTOs
//! └─────────────┘
//! ```
//!
//! Validation runs in two layers: schema rules on the DTOs (`validator`
//! derives) and cross-entity rules in [`validation`] (sku uniqueness,
//! category existence, self-parent prevention). Cross-entity failures
//! are aggregated into one batch so a client sees every violation in a
//! single round trip. The database constraints (unique sku index,
//! restrict/set-null foreign keys) back those pre-checks and win when
//! concurrent writes race past them.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers,
//!     postgres::{PgCategoryRepository, PgProductRepository},
//!     service::{CategoryService, ProductService},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = database::postgres::connect("postgresql://localhost/catalog").await?;
//!
//! let products = ProductService::new(
//!     PgProductRepository::new(db.clone()),
//!     PgCategoryRepository::new(db.clone()),
//! );
//! let categories = CategoryService::new(PgCategoryRepository::new(db));
//!
//! let router = handlers::products::router(products)
//!     .merge(handlers::categories::router(categories));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult, ConflictKind};
pub use models::{
    Category, CategoryWithChildren, CreateCategory, CreateProduct, Product, ProductSearchParams,
    UpdateCategory, UpdateProduct,
};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{
    CategoryRepository, InMemoryCategoryRepository, InMemoryProductRepository, ProductRepository,
};
pub use service::{CategoryService, ProductService};
