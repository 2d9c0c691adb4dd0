use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Which storage constraint produced a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A unique index rejected the write (e.g. duplicate sku)
    Unique,
    /// A foreign key rejected the write (e.g. category still referenced)
    ForeignKey,
}

/// Closed error type for catalog operations.
///
/// `Validation` carries the full batch of field violations; `NotFound`
/// is structurally distinct from it (no field errors accompany a
/// missing primary entity). `Conflict` covers storage-level constraint
/// violations that pass application pre-checks (races, cross-entity
/// delete restrictions).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Conflict: {message}")]
    Conflict {
        kind: ConflictKind,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(DbErr),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        CatalogError::NotFound { entity, id }
    }
}

/// Classify low-level database errors. Constraint violations become
/// conflicts keyed by constraint kind; everything else stays a database
/// error.
impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => CatalogError::Conflict {
                kind: ConflictKind::Unique,
                message,
            },
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => CatalogError::Conflict {
                kind: ConflictKind::ForeignKey,
                message,
            },
            _ => CatalogError::Database(err),
        }
    }
}

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { entity, id } => {
                AppError::NotFound(format!("{} {} not found", entity, id))
            }
            CatalogError::Validation(errors) => AppError::FieldErrors(errors),
            CatalogError::Conflict { kind, message } => AppError::Conflict(match kind {
                ConflictKind::Unique => format!("Unique constraint violated: {}", message),
                ConflictKind::ForeignKey => {
                    format!("Operation restricted by dependent rows: {}", message)
                }
            }),
            CatalogError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
