//! Catalog API - REST server for products and hierarchical categories

use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");

    let db =
        database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;

    database::postgres::run_migrations::<migration::Migrator>(&db, "catalog_api").await?;

    let state = AppState {
        config: config.clone(),
        db: db.clone(),
    };

    // Build the router: domain routes under /api, docs, health/readiness
    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes);
    let app = router
        .merge(health_router(config.app))
        .merge(api::ready_router(&state));

    info!("Starting Catalog API on {}", config.server.address());

    create_app(app, &config.server).await?;

    info!("Shutting down: closing PostgreSQL connection");
    db.close().await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
