use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryWithChildren, CreateCategory, CreateProduct, Product, ProductSearchParams,
    UpdateCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::validation;

/// Service layer for the product write pipeline and search engine.
///
/// Holds both repositories because product writes cross-validate
/// against categories. Every mutation runs its full set of checks and
/// reports all violations in one batch before anything touches storage.
#[derive(Clone)]
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    /// Create a new product after schema and cross-entity validation
    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(validation::schema_errors(&e)))?;

        let mut errors = Vec::new();
        errors.extend(validation::non_negative_price(input.price));
        errors.extend(validation::unique_sku(self.products.as_ref(), &input.sku, None).await?);
        errors.extend(
            validation::category_exists(self.categories.as_ref(), input.category_id, "category_id")
                .await?,
        );

        if !errors.is_empty() {
            return Err(CatalogError::Validation(errors));
        }

        self.products.create(input).await
    }

    /// Get a product by id
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> CatalogResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::not_found("Product", id))
    }

    /// List all products with their category summaries
    pub async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        self.products.list().await
    }

    /// Filtered, paginated product search.
    ///
    /// Filter consistency is validated before any query is executed; an
    /// inverted price range never reaches the store.
    #[instrument(skip(self, params))]
    pub async fn search_products(&self, params: ProductSearchParams) -> CatalogResult<Vec<Product>> {
        params
            .validate()
            .map_err(|e| CatalogError::Validation(validation::schema_errors(&e)))?;

        if let Some(error) = validation::price_range(params.min_price, params.max_price) {
            return Err(CatalogError::Validation(vec![error]));
        }

        self.products.search(params).await
    }

    /// Partially update a product; only supplied fields change.
    ///
    /// A missing target is a not-found outcome, structurally distinct
    /// from a validation failure.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: i32, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(validation::schema_errors(&e)))?;

        if self.products.get_by_id(id).await?.is_none() {
            return Err(CatalogError::not_found("Product", id));
        }

        let mut errors = Vec::new();
        if let Some(price) = input.price {
            errors.extend(validation::non_negative_price(price));
        }
        if let Some(ref sku) = input.sku {
            // Excluding the current row lets an unchanged sku pass
            errors.extend(validation::unique_sku(self.products.as_ref(), sku, Some(id)).await?);
        }
        if let Some(category_id) = input.category_id {
            errors.extend(
                validation::category_exists(self.categories.as_ref(), category_id, "category_id")
                    .await?,
            );
        }

        if !errors.is_empty() {
            return Err(CatalogError::Validation(errors));
        }

        self.products.update(id, input).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> CatalogResult<()> {
        if !self.products.delete(id).await? {
            return Err(CatalogError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Service layer for the category hierarchy.
#[derive(Clone)]
pub struct CategoryService<C: CategoryRepository> {
    categories: Arc<C>,
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(categories: C) -> Self {
        Self {
            categories: Arc::new(categories),
        }
    }

    /// Create a new category; a supplied parent must exist
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(validation::schema_errors(&e)))?;

        if let Some(parent_id) = input.parent_id {
            if let Some(error) =
                validation::category_exists(self.categories.as_ref(), parent_id, "parent_id")
                    .await?
            {
                return Err(CatalogError::Validation(vec![error]));
            }
        }

        self.categories.create(input).await
    }

    /// Get a category with its direct children
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i32) -> CatalogResult<CategoryWithChildren> {
        self.categories
            .get_with_children(id)
            .await?
            .ok_or(CatalogError::not_found("Category", id))
    }

    /// List all categories
    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.categories.list().await
    }

    /// Partially update a category.
    ///
    /// When a new parent is supplied, parent-existence and self-parent
    /// checks both run unconditionally so a single update reports every
    /// violation at once.
    #[instrument(skip(self, input))]
    pub async fn update_category(&self, id: i32, input: UpdateCategory) -> CatalogResult<Category> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(validation::schema_errors(&e)))?;

        if self.categories.get_by_id(id).await?.is_none() {
            return Err(CatalogError::not_found("Category", id));
        }

        if let Some(parent_id) = input.parent_id {
            let mut errors = Vec::new();
            errors.extend(
                validation::category_exists(self.categories.as_ref(), parent_id, "parent_id")
                    .await?,
            );
            errors.extend(validation::distinct_parent(id, parent_id));

            if !errors.is_empty() {
                return Err(CatalogError::Validation(errors));
            }
        }

        self.categories.update(id, input).await
    }

    /// Delete a category.
    ///
    /// Deletion may still be rejected by the store when products
    /// reference the category; that surfaces as a conflict, not a
    /// validation error.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> CatalogResult<()> {
        if !self.categories.delete(id).await? {
            return Err(CatalogError::not_found("Category", id));
        }

        Ok(())
    }
}
