//! Cross-entity validation checks.
//!
//! Each check returns `Option<FieldError>` (None = rule holds) instead
//! of failing fast, so callers can run every applicable check and
//! report all violations in one batch. The store-backed checks here are
//! advisory: the matching database constraints remain the source of
//! truth under concurrency.

use axum_helpers::FieldError;
use rust_decimal::Decimal;
use validator::ValidationErrors;

use crate::error::CatalogResult;
use crate::repository::{CategoryRepository, ProductRepository};

/// Fails when another product row already holds this sku. During an
/// update, `exclude_id` skips the row being updated so resubmitting an
/// unchanged sku does not collide with itself.
pub async fn unique_sku<R>(
    repo: &R,
    sku: &str,
    exclude_id: Option<i32>,
) -> CatalogResult<Option<FieldError>>
where
    R: ProductRepository + ?Sized,
{
    if repo.sku_exists(sku, exclude_id).await? {
        Ok(Some(FieldError::new(
            "sku",
            format!("sku={} already exists", sku),
        )))
    } else {
        Ok(None)
    }
}

/// Fails when no category row has this id. `field` names the reported
/// field: "category_id" for product writes, "parent_id" for category
/// writes.
pub async fn category_exists<R>(
    repo: &R,
    category_id: i32,
    field: &str,
) -> CatalogResult<Option<FieldError>>
where
    R: CategoryRepository + ?Sized,
{
    if repo.exists(category_id).await? {
        Ok(None)
    } else {
        Ok(Some(FieldError::new(
            field,
            format!("{}={} does not exist", field, category_id),
        )))
    }
}

/// Price must be non-negative. The DTO schema already enforces this;
/// the service runs it again before any row is written.
pub fn non_negative_price(price: Decimal) -> Option<FieldError> {
    if price < Decimal::ZERO {
        Some(FieldError::new(
            "price",
            "price must be greater than or equal to 0",
        ))
    } else {
        None
    }
}

/// Rejects inverted price ranges before any query runs. Reported on the
/// combined field because neither bound is individually wrong.
pub fn price_range(min: Option<Decimal>, max: Option<Decimal>) -> Option<FieldError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Some(FieldError::new(
            "min_price & max_price",
            format!("min_price={} must not exceed max_price={}", min, max),
        )),
        _ => None,
    }
}

/// A category must not become its own parent. Only the immediate parent
/// is checked; longer cycles are not walked.
pub fn distinct_parent(id: i32, parent_id: i32) -> Option<FieldError> {
    if id == parent_id {
        Some(FieldError::new(
            "parent_id",
            "a category cannot be its own parent",
        ))
    } else {
        None
    }
}

/// Flatten schema-level validator output into field errors, ordered by
/// field name for deterministic responses.
pub fn schema_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, violations) in errors.field_errors() {
        for violation in violations.iter() {
            let message = violation
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid value (rule: {})", violation.code));
            out.push(FieldError::new(field.to_string(), message));
        }
    }
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}
