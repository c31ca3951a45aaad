//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod material;
pub mod product;
pub mod product_composition;

// Re-export specific types to avoid conflicts
pub use material::{Column as MaterialColumn, Entity as Material, Model as MaterialModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_composition::{
    Column as CompositionColumn, Entity as ProductComposition, Model as CompositionModel,
};
