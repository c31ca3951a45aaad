//! Material business logic - Handles all material-related operations.
//!
//! Materials form the catalog that product compositions draw from. The
//! catalog is seeded from config.toml on startup and managed through the
//! usual CRUD operations afterwards.

use crate::{
    config::catalog::MaterialSeed,
    entities::{Material, material},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all active (non-deleted) materials, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_materials(db: &DatabaseConnection) -> Result<Vec<material::Model>> {
    Material::find()
        .filter(material::Column::IsActive.eq(true))
        .order_by_asc(material::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an active material by its unique ID, returning None if not found or deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_material_by_id(
    db: &DatabaseConnection,
    material_id: i32,
) -> Result<Option<material::Model>> {
    Material::find_by_id(material_id)
        .filter(material::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an active material by its code, returning None if not found or deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_material_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<material::Model>> {
    Material::find()
        .filter(material::Column::Code.eq(code))
        .filter(material::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Searches active materials whose name contains the given term, ordered by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn search_materials(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<material::Model>> {
    Material::find()
        .filter(material::Column::Name.contains(term))
        .filter(material::Column::IsActive.eq(true))
        .order_by_asc(material::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new material, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name or code is empty or whitespace-only
/// - An active material already uses the code
/// - The database insert operation fails
pub async fn create_material(
    db: &DatabaseConnection,
    name: String,
    code: String,
    description: Option<String>,
) -> Result<material::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Material name cannot be empty".to_string(),
        });
    }

    if code.trim().is_empty() {
        return Err(Error::Config {
            message: "Material code cannot be empty".to_string(),
        });
    }

    let code = code.trim().to_string();
    ensure_code_available(db, &code, None).await?;

    let material = material::ActiveModel {
        name: Set(name.trim().to_string()),
        code: Set(code),
        description: Set(description),
        is_active: Set(true),
        ..Default::default()
    };
    material.insert(db).await.map_err(Into::into)
}

/// Updates an existing material's name, code, and description.
///
/// # Errors
/// Returns an error if:
/// - The material does not exist or is already deleted
/// - The name or code is empty
/// - Another active material already uses the code
/// - The database update operation fails
pub async fn update_material(
    db: &DatabaseConnection,
    material_id: i32,
    name: String,
    code: String,
    description: Option<String>,
) -> Result<material::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Material name cannot be empty".to_string(),
        });
    }

    if code.trim().is_empty() {
        return Err(Error::Config {
            message: "Material code cannot be empty".to_string(),
        });
    }

    let mut material: material::ActiveModel = Material::find_by_id(material_id)
        .one(db)
        .await?
        .ok_or(Error::MaterialNotFound { id: material_id })?
        .into();

    if !*material.is_active.as_ref() {
        return Err(Error::MaterialNotFound { id: material_id });
    }

    let code = code.trim().to_string();
    ensure_code_available(db, &code, Some(material_id)).await?;

    material.name = Set(name.trim().to_string());
    material.code = Set(code);
    material.description = Set(description);

    material.update(db).await.map_err(Into::into)
}

/// Soft deletes a material by marking it inactive, preserving composition history.
///
/// # Errors
/// Returns an error if:
/// - The material does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_material(
    db: &DatabaseConnection,
    material_id: i32,
) -> Result<material::Model> {
    let mut material: material::ActiveModel = Material::find_by_id(material_id)
        .one(db)
        .await?
        .ok_or(Error::MaterialNotFound { id: material_id })?
        .into();

    if !*material.is_active.as_ref() {
        return Err(Error::MaterialNotFound { id: material_id });
    }

    material.is_active = Set(false);

    material.update(db).await.map_err(Into::into)
}

/// Seeds the material catalog from configuration, skipping codes that already
/// exist (active or not), so repeated startups never duplicate rows.
///
/// Returns the number of materials inserted.
///
/// # Errors
/// Returns an error if a database query or insert fails.
pub async fn seed_materials(db: &DatabaseConnection, seeds: &[MaterialSeed]) -> Result<usize> {
    let mut inserted = 0;

    for seed in seeds {
        let existing = Material::find()
            .filter(material::Column::Code.eq(seed.code.as_str()))
            .one(db)
            .await?;

        if existing.is_none() {
            let material = material::ActiveModel {
                name: Set(seed.name.clone()),
                code: Set(seed.code.clone()),
                description: Set(seed.description.clone()),
                is_active: Set(true),
                ..Default::default()
            };
            material.insert(db).await?;
            inserted += 1;
        }
    }

    Ok(inserted)
}

/// Rejects a code already used by another active material.
async fn ensure_code_available(
    db: &DatabaseConnection,
    code: &str,
    exclude_id: Option<i32>,
) -> Result<()> {
    let mut query = Material::find()
        .filter(material::Column::Code.eq(code))
        .filter(material::Column::IsActive.eq(true));

    if let Some(id) = exclude_id {
        query = query.filter(material::Column::Id.ne(id));
    }

    if query.one(db).await?.is_some() {
        return Err(Error::DuplicateCode {
            code: code.to_string(),
        });
    }

    Ok(())
}
