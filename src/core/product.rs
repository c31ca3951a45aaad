//! Product business logic - Handles all product-related operations.
//!
//! Products declare the total weight that material compositions are validated
//! against. All functions are async and return Result types for error
//! handling; read queries filter the soft-delete flag explicitly.

use crate::{
    core::validation,
    entities::{Product, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all active (non-deleted) products, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsActive.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active product by its unique ID, returning None if not found or deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .filter(product::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active product by its SKU, returning None if not found or deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_sku(
    db: &DatabaseConnection,
    sku: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Sku.eq(sku))
        .filter(product::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Searches active products whose name contains the given term, ordered by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn search_products(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::Name.contains(term))
        .filter(product::Column::IsActive.eq(true))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product, performing input validation.
///
/// The name and SKU must be non-empty, the SKU unique among active products,
/// and the weight positive. The weight is stored at 3 decimal places,
/// half-up.
///
/// # Errors
/// Returns an error if:
/// - The name or SKU is empty or whitespace-only
/// - The weight is zero or negative
/// - An active product already uses the SKU
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    sku: String,
    description: Option<String>,
    weight: Decimal,
) -> Result<product::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if sku.trim().is_empty() {
        return Err(Error::Config {
            message: "Product SKU cannot be empty".to_string(),
        });
    }

    if weight <= Decimal::ZERO {
        return Err(Error::InvalidWeight { weight });
    }

    let sku = sku.trim().to_string();
    ensure_sku_available(db, &sku, None).await?;

    let now = chrono::Utc::now().naive_utc();

    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        sku: Set(sku),
        description: Set(description),
        weight: Set(validation::round_weight(weight)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Updates an existing product's name, SKU, description, and weight.
///
/// Reducing the weight does not revalidate stored compositions; the audit
/// endpoint surfaces any rows that no longer fit.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already deleted
/// - The name or SKU is empty, or the weight is not positive
/// - Another active product already uses the SKU
/// - The database update operation fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i32,
    name: String,
    sku: String,
    description: Option<String>,
    weight: Decimal,
) -> Result<product::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if sku.trim().is_empty() {
        return Err(Error::Config {
            message: "Product SKU cannot be empty".to_string(),
        });
    }

    if weight <= Decimal::ZERO {
        return Err(Error::InvalidWeight { weight });
    }

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if !*product.is_active.as_ref() {
        return Err(Error::ProductNotFound { id: product_id });
    }

    let sku = sku.trim().to_string();
    ensure_sku_available(db, &sku, Some(product_id)).await?;

    product.name = Set(name.trim().to_string());
    product.sku = Set(sku);
    product.description = Set(description);
    product.weight = Set(validation::round_weight(weight));
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// Soft deletes a product by marking it inactive, preserving composition history.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_product(db: &DatabaseConnection, product_id: i32) -> Result<product::Model> {
    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    if !*product.is_active.as_ref() {
        return Err(Error::ProductNotFound { id: product_id });
    }

    product.is_active = Set(false);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// Rejects a SKU already used by another active product.
async fn ensure_sku_available(
    db: &DatabaseConnection,
    sku: &str,
    exclude_id: Option<i32>,
) -> Result<()> {
    let mut query = Product::find()
        .filter(product::Column::Sku.eq(sku))
        .filter(product::Column::IsActive.eq(true));

    if let Some(id) = exclude_id {
        query = query.filter(product::Column::Id.ne(id));
    }

    if query.one(db).await?.is_some() {
        return Err(Error::DuplicateSku {
            sku: sku.to_string(),
        });
    }

    Ok(())
}
