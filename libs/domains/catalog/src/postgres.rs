use async_trait::async_trait;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::{
    entity::{category, product},
    error::{CatalogError, CatalogResult},
    models::{
        Category, CategoryWithChildren, CreateCategory, CreateProduct, Product,
        ProductSearchParams, UpdateCategory, UpdateProduct,
    },
    repository::{CategoryRepository, ProductRepository},
};

/// Escape LIKE wildcards in a user-supplied fragment and wrap it for a
/// substring match.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let active: product::ActiveModel = input.into();

        // A concurrent create with the same sku loses here: the unique
        // index rejects it and the error surfaces as a conflict.
        let model = active.insert(&self.db).await?;

        let category = model.find_related(category::Entity).one(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into_product(category))
    }

    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Product>> {
        let found = product::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(&self.db)
            .await?;

        Ok(found.map(|(model, category)| model.into_product(category)))
    }

    async fn list(&self) -> CatalogResult<Vec<Product>> {
        let rows = product::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, category)| model.into_product(category))
            .collect())
    }

    async fn search(&self, params: ProductSearchParams) -> CatalogResult<Vec<Product>> {
        let mut query = product::Entity::find().find_also_related(category::Entity);

        if let Some(ref title) = params.title {
            query = query.filter(
                Expr::col((product::Entity, product::Column::Title)).ilike(like_pattern(title)),
            );
        }
        if let Some(ref sku) = params.sku {
            query = query.filter(product::Column::Sku.eq(sku.as_str()));
        }
        if let Some(min_price) = params.min_price {
            query = query.filter(product::Column::Price.gte(min_price));
        }
        if let Some(max_price) = params.max_price {
            query = query.filter(product::Column::Price.lte(max_price));
        }
        if let Some(category_id) = params.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }

        // Ascending id keeps pagination stable across repeated calls
        let rows = query
            .order_by_asc(product::Column::Id)
            .limit(params.limit)
            .offset(params.offset)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, category)| model.into_product(category))
            .collect())
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> CatalogResult<Product> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::not_found("Product", id))?;

        if input.is_empty() {
            let category = model.find_related(category::Entity).one(&self.db).await?;
            return Ok(model.into_product(category));
        }

        // Only supplied fields change; absent fields stay Unchanged
        let mut active: product::ActiveModel = model.into();
        if let Some(sku) = input.sku {
            active.sku = Set(sku);
        }
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(image) = input.image {
            active.image = Set(Some(image.to_string()));
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }

        let updated = active.update(&self.db).await?;
        let category = updated.find_related(category::Entity).one(&self.db).await?;

        tracing::info!(product_id = id, "Updated product");
        Ok(updated.into_product(category))
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn sku_exists(&self, sku: &str, exclude_id: Option<i32>) -> CatalogResult<bool> {
        let mut query = product::Entity::find().filter(product::Column::Sku.eq(sku));
        if let Some(id) = exclude_id {
            query = query.filter(product::Column::Id.ne(id));
        }

        Ok(query.one(&self.db).await?.is_some())
    }
}

pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let active: category::ActiveModel = input.into();
        let model = active.insert(&self.db).await?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_with_children(&self, id: i32) -> CatalogResult<Option<CategoryWithChildren>> {
        let Some(model) = category::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        // One level only; grandchildren are not loaded
        let children = category::Entity::find()
            .filter(category::Column::ParentId.eq(id))
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(Some(CategoryWithChildren {
            id: model.id,
            name: model.name,
            parent_id: model.parent_id,
            children: children.into_iter().map(Into::into).collect(),
        }))
    }

    async fn list(&self) -> CatalogResult<Vec<Category>> {
        let rows = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i32, input: UpdateCategory) -> CatalogResult<Category> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogError::not_found("Category", id))?;

        if input.is_empty() {
            return Ok(model.into());
        }

        let mut active: category::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(Some(parent_id));
        }

        let updated = active.update(&self.db).await?;

        tracing::info!(category_id = id, "Updated category");
        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        // The RESTRICT foreign key from products turns into a conflict;
        // the SET NULL parent key detaches children.
        let result = category::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(category_id = id, "Deleted category");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists(&self, id: i32) -> CatalogResult<bool> {
        Ok(category::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .is_some())
    }
}
