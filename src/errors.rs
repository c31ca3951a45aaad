//! Unified error types for the EPR backend.
//!
//! All services return `Result<T>` with this error enum. Validation errors
//! carry the numbers involved so the API layer can surface remaining-capacity
//! detail to the caller without re-querying.

use rust_decimal::Decimal;
use thiserror::Error;

/// Application error type shared across config, core, and API layers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Product with ID {id} not found")]
    ProductNotFound { id: i32 },

    #[error("Material with ID {id} not found")]
    MaterialNotFound { id: i32 },

    #[error("Product composition with ID {id} not found")]
    CompositionNotFound { id: i32 },

    #[error("Composition already exists for product {product_id} and material {material_id}")]
    DuplicateComposition { product_id: i32, material_id: i32 },

    #[error("A product with SKU '{sku}' already exists")]
    DuplicateSku { sku: String },

    #[error("A material with code '{code}' already exists")]
    DuplicateCode { code: String },

    #[error("Material weight must be greater than 0 kg (got {weight} kg)")]
    InvalidWeight { weight: Decimal },

    #[error("Composition percentage must be greater than 0 and at most 100 (got {percentage}%)")]
    InvalidPercentage { percentage: Decimal },

    #[error(
        "Individual material weight ({weight} kg) cannot exceed product weight ({product_weight} kg)"
    )]
    WeightExceedsProduct {
        weight: Decimal,
        product_weight: Decimal,
    },

    #[error(
        "Total material weight would exceed product weight. Product weight: {product_weight} kg, \
         current material total: {current_total} kg, remaining capacity: {remaining} kg, \
         attempting to add: {attempted} kg"
    )]
    WeightCapacityExceeded {
        product_weight: Decimal,
        current_total: Decimal,
        remaining: Decimal,
        attempted: Decimal,
    },

    #[error(
        "Total composition percentage would exceed 100%. Current total: {current_total}%, \
         remaining: {remaining}%, attempting to add: {attempted}%"
    )]
    PercentageCapacityExceeded {
        current_total: Decimal,
        remaining: Decimal,
        attempted: Decimal,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
