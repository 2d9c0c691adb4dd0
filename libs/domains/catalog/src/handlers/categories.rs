use axum::{
    extract::State,
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
use crate::models::{Category, CategoryWithChildren, CreateCategory, UpdateCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

pub const TAG: &str = "Categories";

/// OpenAPI documentation for the category endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(Category, CategoryWithChildren, CreateCategory, UpdateCategory),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Category hierarchy endpoints")
    )
)]
pub struct ApiDoc;

/// Create the category router with all HTTP endpoints
pub fn router<C>(service: CategoryService<C>) -> Router
where
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .with_state(shared_service)
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn list_categories<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
) -> CatalogResult<Json<Vec<Category>>> {
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created successfully", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn create_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;

    AuditEvent::new(
        "category.create",
        Some(format!("category:{}", category.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .with_details(json!({
        "name": category.name,
        "parent_id": category.parent_id,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(category)))
}

/// Get a category with its direct children
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryWithChildren),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn get_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<CategoryWithChildren>> {
    let category = service.get_category(id).await?;
    Ok(Json(category))
}

/// Partially update a category; absent fields are untouched
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated successfully", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn update_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> CatalogResult<Json<Category>> {
    let category = service.update_category(id, input).await?;
    Ok(Json(category))
}

/// Delete a category.
///
/// Fails with a conflict while products still reference it; children
/// are detached by the store.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Category id")
    ),
    responses(
        (status = 204, description = "Category deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(crate) async fn delete_category<C: CategoryRepository>(
    State(service): State<Arc<CategoryService<C>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_category(id).await?;

    AuditEvent::new(
        "category.delete",
        Some(format!("category:{}", id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(&headers))
    .with_user_agent(extract_user_agent(&headers))
    .log();

    Ok(StatusCode::NO_CONTENT)
}
