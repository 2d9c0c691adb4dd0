//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Catalog management API: products and hierarchical categories",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_catalog::handlers::products::ApiDoc),
        (path = "/api/categories", api = domain_catalog::handlers::categories::ApiDoc)
    )
)]
pub struct ApiDoc;
