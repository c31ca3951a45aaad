//! Material entity - Represents raw materials available for product compositions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Material database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the material
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Human-readable material name (e.g., "Aluminium", "PET")
    pub name: String,
    /// Short material code, unique among active materials
    pub code: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Soft delete flag - if false, material is hidden but data is preserved
    pub is_active: bool,
}

/// Defines relationships between Material and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One material appears in many product compositions
    #[sea_orm(has_many = "super::product_composition::Entity")]
    Compositions,
}

impl Related<super::product_composition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compositions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
