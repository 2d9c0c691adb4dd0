use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Price rule shared by the create/update/search schemas: non-negative,
/// at most 2 fractional digits. The same non-negativity rule is enforced
/// again at the service layer and by the NUMERIC(12,2) column.
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("price must be greater than or equal to 0".into());
        return Err(err);
    }
    if price.scale() > 2 {
        let mut err = ValidationError::new("price_scale");
        err.message = Some("price must have at most 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// Unique identifier
    pub id: i32,
    /// Category name
    pub name: String,
    /// Parent category; null means root-level
    pub parent_id: Option<i32>,
}

/// Category read model with its direct children (one level only;
/// grandchildren are not loaded).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithChildren {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    /// Categories whose parent_id equals this id
    pub children: Vec<Category>,
}

/// DTO for creating a new category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Must reference an existing category when set
    pub parent_id: Option<i32>,
}

/// DTO for updating an existing category; absent fields are untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub parent_id: Option<i32>,
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}

/// Product entity; reads eager-load the category summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: i32,
    /// Stock keeping unit, unique across all products
    pub sku: String,
    /// Product title
    pub title: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Image URL in its canonical string form
    pub image: Option<String>,
    /// Price with two fractional digits
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    /// Owning category
    pub category_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    /// Image URL; parsed on the way in, persisted as its canonical string
    #[schema(value_type = Option<String>, example = "https://example.com/img.png")]
    pub image: Option<Url>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    /// Must reference an existing category
    pub category_id: i32,
}

/// DTO for partially updating a product; absent fields are untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "https://example.com/img.png")]
    pub image: Option<Url>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "24.50")]
    pub price: Option<Decimal>,
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.price.is_none()
            && self.category_id.is_none()
    }
}

/// Query filters for product search. All filters are optional and
/// conjunctive.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct ProductSearchParams {
    /// Case-insensitive substring match on title
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// Exact sku match
    #[validate(length(min = 1, max = 64))]
    pub sku: Option<String>,
    /// Inclusive lower price bound
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "10")]
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "25")]
    pub max_price: Option<Decimal>,
    /// Exact category match
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
    /// Maximum number of results (1-100)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    /// Number of results to skip
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    100
}

impl Default for ProductSearchParams {
    fn default() -> Self {
        Self {
            title: None,
            sku: None,
            min_price: None,
            max_price: None,
            category_id: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}
