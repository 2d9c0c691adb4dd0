//! API route assembly

mod health;

use axum::Router;
use domain_catalog::{
    handlers, CategoryService, PgCategoryRepository, PgProductRepository, ProductService,
};

use crate::state::AppState;

pub use health::ready_router;

/// Build the domain routers with their services wired to Postgres
pub fn routes(state: &AppState) -> Router {
    let products = ProductService::new(
        PgProductRepository::new(state.db.clone()),
        PgCategoryRepository::new(state.db.clone()),
    );
    let categories = CategoryService::new(PgCategoryRepository::new(state.db.clone()));

    Router::new()
        .nest("/products", handlers::products::router(products))
        .nest("/categories", handlers::categories::router(categories))
}
