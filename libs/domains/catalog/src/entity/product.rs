use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

/// SeaORM entity for the products table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub sku: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub image: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // RESTRICT: a category cannot be deleted while products reference it
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Build the read model, attaching the eager-loaded category summary.
    pub fn into_product(self, category: Option<super::category::Model>) -> crate::models::Product {
        crate::models::Product {
            id: self.id,
            sku: self.sku,
            title: self.title,
            description: self.description,
            image: self.image,
            price: self.price,
            category_id: self.category_id,
            category: category.map(Into::into),
        }
    }
}

impl From<Model> for crate::models::Product {
    fn from(model: Model) -> Self {
        model.into_product(None)
    }
}

// Conversion from the create DTO to an ActiveModel. The image URL is
// stored in its canonical string form.
impl From<crate::models::CreateProduct> for ActiveModel {
    fn from(input: crate::models::CreateProduct) -> Self {
        ActiveModel {
            id: NotSet,
            title: Set(input.title),
            sku: Set(input.sku),
            description: Set(input.description),
            image: Set(input.image.map(|url| url.to_string())),
            price: Set(input.price),
            category_id: Set(input.category_id),
        }
    }
}
