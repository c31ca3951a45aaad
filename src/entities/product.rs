//! Product entity - Represents products registered for EPR compliance tracking.
//!
//! Each product declares a total weight in kilograms. Material compositions
//! assigned to the product may never exceed that weight in sum, nor 100% in
//! combined percentage share.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Human-readable product name (e.g., "500ml PET Bottle")
    pub name: String,
    /// SKU / product code, unique among active products
    pub sku: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Declared total product weight in kilograms, 3 decimal places
    #[sea_orm(column_type = "Decimal(Some((13, 3)))")]
    pub weight: Decimal,
    /// Soft delete flag - if false, product is hidden but data is preserved
    pub is_active: bool,
    /// When the product was registered
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many material compositions
    #[sea_orm(has_many = "super::product_composition::Entity")]
    Compositions,
}

impl Related<super::product_composition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compositions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
