//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::expect_used)]

use crate::{
    config,
    core::{composition, material, product},
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a decimal literal, panicking on malformed test input.
pub fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `description`: None
/// * `weight`: 10.000 kg
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    sku: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), sku.to_string(), None, dec("10.000")).await
}

/// Creates a test material with no description.
pub async fn create_test_material(
    db: &DatabaseConnection,
    name: &str,
    code: &str,
) -> Result<entities::material::Model> {
    material::create_material(db, name.to_string(), code.to_string(), None).await
}

/// Creates a test composition with no notes.
pub async fn create_test_composition(
    db: &DatabaseConnection,
    product_id: i32,
    material_id: i32,
    weight: &str,
    percentage: &str,
) -> Result<entities::product_composition::Model> {
    composition::create_composition(db, product_id, material_id, dec(weight), dec(percentage), None)
        .await
}

/// Sets up a complete test environment with one product and one material.
/// Returns (db, product, material) for common composition test scenarios.
pub async fn setup_with_product_and_material() -> Result<(
    DatabaseConnection,
    entities::product::Model,
    entities::material::Model,
)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "PET Bottle", "BTL-500").await?;
    let material = create_test_material(&db, "Aluminium", "ALU").await?;
    Ok((db, product, material))
}
