use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent, AuditEvent, AuditOutcome, IdPath, ValidatedJson,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{Category, CreateProduct, Product, ProductSearchParams, UpdateProduct};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::ProductService;

pub const TAG: &str = "Products";

/// OpenAPI documentation for the product endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        search_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ProductSearchParams, Category),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product management and search endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<P, C>(service: ProductService<P, C>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route(
            "/{id}",
            get(get_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

/// List all products with their category summaries
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn list_products<P: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<P, C>>>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Search products with composable filters and pagination
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(ProductSearchParams),
    responses(
        (status = 200, description = "Matching products, ascending by id", body = Vec<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn search_products<P: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<P, C>>>,
    Query(params): Query<ProductSearchParams>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.search_products(params).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn create_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<P, C>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create_product(input).await?;

    AuditEvent::new(
        "product.create",
        Some(format!("product:{}", product.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "sku": product.sku,
        "category_id": product.category_id,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn get_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<P, C>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Partially update a product; absent fields are untouched
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn update_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<P, C>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn delete_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<Arc<ProductService<P, C>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_product(id).await?;

    AuditEvent::new(
        "product.delete",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(StatusCode::NO_CONTENT)
}
