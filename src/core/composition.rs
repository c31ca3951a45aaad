//! Product composition business logic - assigns materials to products under
//! weight and percentage limits.
//!
//! Writes run the pure validator from [`crate::core::validation`] against the
//! product's currently active compositions inside a database transaction, so
//! a request either persists a fully valid record or nothing. Reads recompute
//! all aggregates from the active rows on demand; nothing is cached.
//!
//! There is deliberately no cross-request serialization of the
//! check-then-write sequence: two concurrent creates for the same product can
//! both validate against the same stored sums and together overshoot the
//! limit. The audit operation exists to surface such rows after the fact.

use crate::{
    core::validation::{self, CompositionAmounts, WeightReport},
    entities::{Material, Product, ProductComposition, material, product, product_composition},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Retrieves all active compositions across all products.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_compositions(
    db: &DatabaseConnection,
) -> Result<Vec<product_composition::Model>> {
    ProductComposition::find()
        .filter(product_composition::Column::IsActive.eq(true))
        .order_by_asc(product_composition::Column::ProductId)
        .order_by_asc(product_composition::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active composition by its unique ID, returning None if not found
/// or deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_composition_by_id(
    db: &DatabaseConnection,
    composition_id: i32,
) -> Result<Option<product_composition::Model>> {
    ProductComposition::find_by_id(composition_id)
        .filter(product_composition::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active compositions of a product.
///
/// Generic over the connection so the write paths can reuse it inside their
/// transaction.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_compositions_for_product<C>(
    db: &C,
    product_id: i32,
) -> Result<Vec<product_composition::Model>>
where
    C: ConnectionTrait,
{
    ProductComposition::find()
        .filter(product_composition::Column::ProductId.eq(product_id))
        .filter(product_composition::Column::IsActive.eq(true))
        .order_by_asc(product_composition::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active compositions using a material, across products.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_compositions_for_material(
    db: &DatabaseConnection,
    material_id: i32,
) -> Result<Vec<product_composition::Model>> {
    ProductComposition::find()
        .filter(product_composition::Column::MaterialId.eq(material_id))
        .filter(product_composition::Column::IsActive.eq(true))
        .order_by_asc(product_composition::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new composition after validating it against the product's
/// remaining weight and percentage capacity.
///
/// The referenced product and material must exist and be active, the
/// (product, material) pair must not already have an active composition, and
/// the candidate amounts must keep the product's sums within bounds. Weight
/// and percentage are normalized to their storage scales (3 and 2 decimal
/// places, half-up) before validation.
///
/// # Errors
/// Returns an error if:
/// - The product or material is missing or deleted
/// - An active composition already exists for the pair
/// - The candidate amounts violate a weight or percentage bound
/// - A database operation fails
pub async fn create_composition(
    db: &DatabaseConnection,
    product_id: i32,
    material_id: i32,
    weight: Decimal,
    percentage: Decimal,
    notes: Option<String>,
) -> Result<product_composition::Model> {
    let weight = validation::round_weight(weight);
    let percentage = validation::round_percentage(percentage);

    // One transaction per request: validate and persist together.
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .filter(product::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    Material::find_by_id(material_id)
        .filter(material::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::MaterialNotFound { id: material_id })?;

    let duplicate = ProductComposition::find()
        .filter(product_composition::Column::ProductId.eq(product_id))
        .filter(product_composition::Column::MaterialId.eq(material_id))
        .filter(product_composition::Column::IsActive.eq(true))
        .one(&txn)
        .await?;
    if duplicate.is_some() {
        return Err(Error::DuplicateComposition {
            product_id,
            material_id,
        });
    }

    let existing = get_compositions_for_product(&txn, product_id).await?;
    let entries: Vec<CompositionAmounts> = existing.iter().map(Into::into).collect();
    validation::check_candidate(product.weight, &entries, weight, percentage, None)?;

    let now = chrono::Utc::now().naive_utc();
    let composition = product_composition::ActiveModel {
        product_id: Set(product_id),
        material_id: Set(material_id),
        weight: Set(weight),
        percentage: Set(percentage),
        notes: Set(notes),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = composition.insert(&txn).await?;

    txn.commit().await?;

    Ok(result)
}

/// Updates an existing composition's weight, percentage, and notes.
///
/// The record's own stored amounts are excluded from the sums, so updating a
/// composition to the values it already holds always succeeds.
///
/// # Errors
/// Returns an error if:
/// - The composition does not exist or is already deleted
/// - The product backing it is missing or deleted
/// - The new amounts violate a weight or percentage bound
/// - A database operation fails
pub async fn update_composition(
    db: &DatabaseConnection,
    composition_id: i32,
    weight: Decimal,
    percentage: Decimal,
    notes: Option<String>,
) -> Result<product_composition::Model> {
    let weight = validation::round_weight(weight);
    let percentage = validation::round_percentage(percentage);

    let txn = db.begin().await?;

    let existing = ProductComposition::find_by_id(composition_id)
        .one(&txn)
        .await?
        .ok_or(Error::CompositionNotFound { id: composition_id })?;

    if !existing.is_active {
        return Err(Error::CompositionNotFound { id: composition_id });
    }

    let product = Product::find_by_id(existing.product_id)
        .filter(product::Column::IsActive.eq(true))
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound {
            id: existing.product_id,
        })?;

    let siblings = get_compositions_for_product(&txn, existing.product_id).await?;
    let entries: Vec<CompositionAmounts> = siblings.iter().map(Into::into).collect();
    validation::check_candidate(
        product.weight,
        &entries,
        weight,
        percentage,
        Some(composition_id),
    )?;

    let mut composition: product_composition::ActiveModel = existing.into();
    composition.weight = Set(weight);
    composition.percentage = Set(percentage);
    composition.notes = Set(notes);
    composition.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = composition.update(&txn).await?;

    txn.commit().await?;

    Ok(updated)
}

/// Soft deletes a composition by marking it inactive.
///
/// Sibling records are not revalidated; remaining capacity is always
/// recomputed from the currently active rows, so the freed weight and share
/// become available immediately.
///
/// # Errors
/// Returns an error if:
/// - The composition does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_composition(
    db: &DatabaseConnection,
    composition_id: i32,
) -> Result<product_composition::Model> {
    let mut composition: product_composition::ActiveModel =
        ProductComposition::find_by_id(composition_id)
            .one(db)
            .await?
            .ok_or(Error::CompositionNotFound { id: composition_id })?
            .into();

    if !*composition.is_active.as_ref() {
        return Err(Error::CompositionNotFound { id: composition_id });
    }

    composition.is_active = Set(false);
    composition.updated_at = Set(chrono::Utc::now().naive_utc());

    composition.update(db).await.map_err(Into::into)
}

/// Sum of the active compositions' weights for a product, in kilograms.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn total_material_weight(db: &DatabaseConnection, product_id: i32) -> Result<Decimal> {
    let entries = amounts_for_product(db, product_id).await?;
    Ok(validation::round_weight(validation::weight_total(
        &entries, None,
    )))
}

/// Weight capacity still unassigned for a product.
///
/// # Errors
/// Returns `ProductNotFound` if the product is missing or deleted, or an
/// error if the database query fails.
pub async fn remaining_weight(db: &DatabaseConnection, product_id: i32) -> Result<Decimal> {
    let product = crate::core::product::get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let entries = amounts_for_product(db, product_id).await?;
    Ok(validation::round_weight(validation::remaining_weight(
        product.weight,
        &entries,
    )))
}

/// Sum of the active compositions' percentage shares for a product.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn total_percentage(db: &DatabaseConnection, product_id: i32) -> Result<Decimal> {
    let entries = amounts_for_product(db, product_id).await?;
    Ok(validation::round_percentage(validation::percentage_total(
        &entries, None,
    )))
}

/// Percentage share still unassigned for a product.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn remaining_percentage(db: &DatabaseConnection, product_id: i32) -> Result<Decimal> {
    let entries = amounts_for_product(db, product_id).await?;
    Ok(validation::round_percentage(validation::remaining_percentage(
        &entries,
    )))
}

/// Whether the product's summed percentages are within 100.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn is_percentage_valid(db: &DatabaseConnection, product_id: i32) -> Result<bool> {
    let total = total_percentage(db, product_id).await?;
    Ok(total <= Decimal::ONE_HUNDRED)
}

/// Whether the product's summed material weights are within its declared
/// weight. A missing or deleted product reports false.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn is_weight_valid(db: &DatabaseConnection, product_id: i32) -> Result<bool> {
    let Some(product) = crate::core::product::get_product_by_id(db, product_id).await? else {
        return Ok(false);
    };

    let total = total_material_weight(db, product_id).await?;
    Ok(total <= product.weight)
}

/// Detailed weight check for a product, including remaining capacity.
///
/// A missing or deleted product yields an invalid report rather than an
/// error, matching the read-only nature of the endpoint.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn weight_report(db: &DatabaseConnection, product_id: i32) -> Result<WeightReport> {
    let Some(product) = crate::core::product::get_product_by_id(db, product_id).await? else {
        return Ok(WeightReport {
            valid: false,
            message: "Product not found".to_string(),
            product_weight: Decimal::ZERO,
            material_weight: Decimal::ZERO,
            remaining_weight: Decimal::ZERO,
        });
    };

    let entries = amounts_for_product(db, product_id).await?;
    Ok(validation::weight_report(product.weight, &entries))
}

/// Re-checks all stored compositions of a product against both bounds.
///
/// A product with no active compositions passes trivially. Used to surface
/// rows that became inconsistent, for example after the product's declared
/// weight was reduced.
///
/// # Errors
/// Returns `ProductNotFound` if compositions exist but the product is
/// missing or deleted, a validation error naming the exceeded bound, or an
/// error if a database query fails.
pub async fn audit_compositions(db: &DatabaseConnection, product_id: i32) -> Result<()> {
    let entries = amounts_for_product(db, product_id).await?;
    if entries.is_empty() {
        return Ok(());
    }

    let product = crate::core::product::get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    validation::audit(product.weight, &entries)
}

/// Loads the validator's view of a product's active compositions.
async fn amounts_for_product(
    db: &DatabaseConnection,
    product_id: i32,
) -> Result<Vec<CompositionAmounts>> {
    let compositions = get_compositions_for_product(db, product_id).await?;
    Ok(compositions.iter().map(Into::into).collect())
}
