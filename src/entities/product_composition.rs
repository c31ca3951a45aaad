//! Product composition entity - Assigns a material to a product by weight and share.
//!
//! At most one active composition may exist per (product, material) pair.
//! Weight carries 3 decimal places, the percentage share 2. Related product
//! and material records are looked up explicitly by id in the service layer
//! rather than loaded through the relations below.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product composition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_compositions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the composition
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Product this composition belongs to
    pub product_id: i32,
    /// Material assigned to the product
    pub material_id: i32,
    /// Material weight in kilograms, 3 decimal places
    #[sea_orm(column_type = "Decimal(Some((13, 3)))")]
    pub weight: Decimal,
    /// Share of the product made up by this material, 2 decimal places
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub percentage: Decimal,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// Soft delete flag - if false, composition is hidden but data is preserved
    pub is_active: bool,
    /// When the composition was created
    pub created_at: DateTime,
    /// When the composition was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between ProductComposition and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each composition belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// Each composition references one material
    #[sea_orm(
        belongs_to = "super::material::Entity",
        from = "Column::MaterialId",
        to = "super::material::Column::Id"
    )]
    Material,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Material.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
