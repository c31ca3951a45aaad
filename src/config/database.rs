//! Database configuration module.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust struct definitions without
//! manual SQL.

use crate::entities::{Material, Product, ProductComposition};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://epr.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database using `DATABASE_URL`, falling
/// back to a local `SQLite` file if the variable is not set.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Safe to call on every startup: existing tables are left untouched.
///
/// # Errors
/// Returns an error if a table creation statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    let mut material_table = schema.create_table_from_entity(Material);
    let mut composition_table = schema.create_table_from_entity(ProductComposition);

    db.execute(builder.build(product_table.if_not_exists()))
        .await?;
    db.execute(builder.build(material_table.if_not_exists()))
        .await?;
    db.execute(builder.build(composition_table.if_not_exists()))
        .await?;

    Ok(())
}
