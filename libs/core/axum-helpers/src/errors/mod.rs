pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for all error responses:
/// - `code`: integer error code for logging/monitoring (e.g., 1008)
/// - `error`: machine-readable identifier (e.g., "CONFLICT")
/// - `message`: human-readable error message
/// - `details`: optional structured details (e.g., field errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "Validation failed",
///   "details": [{"field": "sku", "message": "sku=ABC already exists"}]
/// }
/// ```
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// A single field-scoped rule violation.
///
/// Domain validation aggregates these into one batch so a client sees
/// every violation in a single round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// The offending field (may name a field combination, e.g. "min_price & max_price")
    pub field: String,
    /// What rule was violated
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error type that converts to structured HTTP responses.
///
/// Integrates with common error types from dependencies and renders
/// [`ErrorResponse`] bodies with typed [`ErrorCode`]s.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Validation failed")]
    FieldErrors(Vec<FieldError>),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::Database(e) => map_db_error(&e),
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.status(), e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::json!(null))),
                    ErrorCode::ValidationError,
                )
            }
            AppError::FieldErrors(errors) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                    "Validation failed"
                );
                (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_string(),
                    Some(serde_json::to_value(&errors).unwrap_or(serde_json::json!(null))),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidId(raw) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidId.code(),
                    "Invalid path id: {}",
                    raw
                );
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid id: {}", raw),
                    None,
                    ErrorCode::InvalidId,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::ValidationError)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::Conflict(msg) => {
                tracing::warn!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                (StatusCode::CONFLICT, msg, None, ErrorCode::Conflict)
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::info!(
                    error_code = ErrorCode::UnprocessableEntity.code(),
                    "Unprocessable entity: {}",
                    msg
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    msg,
                    None,
                    ErrorCode::UnprocessableEntity,
                )
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError.default_message().to_string(),
                    None,
                    ErrorCode::InternalError,
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    msg,
                    None,
                    ErrorCode::ServiceUnavailable,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Maps a SeaORM `DbErr` to HTTP response components.
///
/// Constraint violations that slip past application-level pre-checks
/// (uniqueness races, foreign-key delete restrictions) are reported as
/// 409 Conflict with the underlying cause when the driver exposes it.
fn map_db_error(error: &DbErr) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            tracing::warn!(
                error_code = ErrorCode::Conflict.code(),
                "Unique constraint violation: {}",
                msg
            );
            (
                StatusCode::CONFLICT,
                format!("Unique constraint violated: {}", msg),
                None,
                ErrorCode::Conflict,
            )
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            tracing::warn!(
                error_code = ErrorCode::Conflict.code(),
                "Foreign key constraint violation: {}",
                msg
            );
            (
                StatusCode::CONFLICT,
                format!("Foreign key constraint violated: {}", msg),
                None,
                ErrorCode::Conflict,
            )
        }
        _ => match error {
            DbErr::RecordNotFound(what) => {
                tracing::info!(
                    error_code = ErrorCode::DatabaseNotFound.code(),
                    "Database record not found: {}",
                    what
                );
                (
                    StatusCode::NOT_FOUND,
                    ErrorCode::DatabaseNotFound.default_message().to_string(),
                    None,
                    ErrorCode::DatabaseNotFound,
                )
            }
            e => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError.default_message().to_string(),
                    None,
                    ErrorCode::DatabaseError,
                )
            }
        },
    }
}
