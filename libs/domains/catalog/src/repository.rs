use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(test)]
use mockall::automock;

use crate::error::{CatalogError, CatalogResult, ConflictKind};
use crate::models::{
    Category, CategoryWithChildren, CreateCategory, CreateProduct, Product, ProductSearchParams,
    UpdateCategory, UpdateProduct,
};

/// Repository trait for product persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product and return it with its assigned id
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Get a product by id with its category summary
    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Product>>;

    /// List all products, ascending by id
    async fn list(&self) -> CatalogResult<Vec<Product>>;

    /// Filtered, paginated search, ascending by id
    async fn search(&self, params: ProductSearchParams) -> CatalogResult<Vec<Product>>;

    /// Apply the supplied fields onto an existing product
    async fn update(&self, id: i32, input: UpdateProduct) -> CatalogResult<Product>;

    /// Delete a product; returns false when the id does not exist
    async fn delete(&self, id: i32) -> CatalogResult<bool>;

    /// Whether a product other than `exclude_id` holds this sku
    async fn sku_exists(&self, sku: &str, exclude_id: Option<i32>) -> CatalogResult<bool>;
}

/// Repository trait for category persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new category and return it with its assigned id
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category>;

    /// Get a category by id
    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Category>>;

    /// Get a category with its direct children (one level)
    async fn get_with_children(&self, id: i32) -> CatalogResult<Option<CategoryWithChildren>>;

    /// List all categories, ascending by id
    async fn list(&self) -> CatalogResult<Vec<Category>>;

    /// Apply the supplied fields onto an existing category
    async fn update(&self, id: i32, input: UpdateCategory) -> CatalogResult<Category>;

    /// Delete a category; returns false when the id does not exist
    async fn delete(&self, id: i32) -> CatalogResult<bool>;

    /// Whether a category row with this id exists
    async fn exists(&self, id: i32) -> CatalogResult<bool>;
}

/// In-memory implementation of ProductRepository (for development/testing).
///
/// Mimics the storage-level unique sku constraint so conflict paths can
/// be exercised without a database. Foreign keys are not simulated.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    inner: Arc<RwLock<ProductStore>>,
}

#[derive(Debug, Default)]
struct ProductStore {
    rows: BTreeMap<i32, Product>,
    next_id: i32,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut store = self.inner.write().await;

        // The unique sku index would reject this at commit time
        if store.rows.values().any(|p| p.sku == input.sku) {
            return Err(CatalogError::Conflict {
                kind: ConflictKind::Unique,
                message: format!("duplicate key value: sku={}", input.sku),
            });
        }

        store.next_id += 1;
        let product = Product {
            id: store.next_id,
            sku: input.sku,
            title: input.title,
            description: input.description,
            image: input.image.map(|url| url.to_string()),
            price: input.price,
            category_id: input.category_id,
            category: None,
        };
        store.rows.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Product>> {
        let store = self.inner.read().await;
        Ok(store.rows.get(&id).cloned())
    }

    async fn list(&self) -> CatalogResult<Vec<Product>> {
        let store = self.inner.read().await;
        // BTreeMap iteration is already ascending by id
        Ok(store.rows.values().cloned().collect())
    }

    async fn search(&self, params: ProductSearchParams) -> CatalogResult<Vec<Product>> {
        let store = self.inner.read().await;
        let title_needle = params.title.as_ref().map(|t| t.to_lowercase());

        let results = store
            .rows
            .values()
            .filter(|p| {
                if let Some(ref needle) = title_needle {
                    if !p.title.to_lowercase().contains(needle) {
                        return false;
                    }
                }
                if let Some(ref sku) = params.sku {
                    if &p.sku != sku {
                        return false;
                    }
                }
                if let Some(min) = params.min_price {
                    if p.price < min {
                        return false;
                    }
                }
                if let Some(max) = params.max_price {
                    if p.price > max {
                        return false;
                    }
                }
                if let Some(category_id) = params.category_id {
                    if p.category_id != category_id {
                        return false;
                    }
                }
                true
            })
            .skip(params.offset as usize)
            .take(params.limit as usize)
            .cloned()
            .collect();

        Ok(results)
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> CatalogResult<Product> {
        let mut store = self.inner.write().await;

        if let Some(ref sku) = input.sku {
            if store.rows.values().any(|p| p.id != id && &p.sku == sku) {
                return Err(CatalogError::Conflict {
                    kind: ConflictKind::Unique,
                    message: format!("duplicate key value: sku={}", sku),
                });
            }
        }

        let product = store
            .rows
            .get_mut(&id)
            .ok_or(CatalogError::not_found("Product", id))?;

        if let Some(sku) = input.sku {
            product.sku = sku;
        }
        if let Some(title) = input.title {
            product.title = title;
        }
        if let Some(description) = input.description {
            product.description = Some(description);
        }
        if let Some(image) = input.image {
            product.image = Some(image.to_string());
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(category_id) = input.category_id {
            product.category_id = category_id;
        }

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let mut store = self.inner.write().await;
        Ok(store.rows.remove(&id).is_some())
    }

    async fn sku_exists(&self, sku: &str, exclude_id: Option<i32>) -> CatalogResult<bool> {
        let store = self.inner.read().await;
        Ok(store
            .rows
            .values()
            .any(|p| p.sku == sku && exclude_id != Some(p.id)))
    }
}

/// In-memory implementation of CategoryRepository (for development/testing).
///
/// Deleting a category detaches its children, matching the SET NULL
/// foreign key.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    inner: Arc<RwLock<CategoryStore>>,
}

#[derive(Debug, Default)]
struct CategoryStore {
    rows: BTreeMap<i32, Category>,
    next_id: i32,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let mut store = self.inner.write().await;

        store.next_id += 1;
        let category = Category {
            id: store.next_id,
            name: input.name,
            parent_id: input.parent_id,
        };
        store.rows.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Category>> {
        let store = self.inner.read().await;
        Ok(store.rows.get(&id).cloned())
    }

    async fn get_with_children(&self, id: i32) -> CatalogResult<Option<CategoryWithChildren>> {
        let store = self.inner.read().await;

        let Some(category) = store.rows.get(&id) else {
            return Ok(None);
        };

        let children = store
            .rows
            .values()
            .filter(|c| c.parent_id == Some(id))
            .cloned()
            .collect();

        Ok(Some(CategoryWithChildren {
            id: category.id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            children,
        }))
    }

    async fn list(&self) -> CatalogResult<Vec<Category>> {
        let store = self.inner.read().await;
        Ok(store.rows.values().cloned().collect())
    }

    async fn update(&self, id: i32, input: UpdateCategory) -> CatalogResult<Category> {
        let mut store = self.inner.write().await;

        let category = store
            .rows
            .get_mut(&id)
            .ok_or(CatalogError::not_found("Category", id))?;

        if let Some(name) = input.name {
            category.name = name;
        }
        if let Some(parent_id) = input.parent_id {
            category.parent_id = Some(parent_id);
        }

        tracing::info!(category_id = id, "Updated category");
        Ok(category.clone())
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let mut store = self.inner.write().await;

        if store.rows.remove(&id).is_none() {
            return Ok(false);
        }

        // SET NULL: detach children of the deleted parent
        for category in store.rows.values_mut() {
            if category.parent_id == Some(id) {
                category.parent_id = None;
            }
        }

        tracing::info!(category_id = id, "Deleted category");
        Ok(true)
    }

    async fn exists(&self, id: i32) -> CatalogResult<bool> {
        let store = self.inner.read().await;
        Ok(store.rows.contains_key(&id))
    }
}
