//! Material catalog loading from config.toml
//!
//! The materials defined in config.toml seed the database on first run or
//! whenever a listed code is missing, so a fresh deployment starts with a
//! usable catalog.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// List of material seeds
    #[serde(default)]
    pub materials: Vec<MaterialSeed>,
}

/// Seed definition for a single material
#[derive(Debug, Deserialize, Clone)]
pub struct MaterialSeed {
    /// Material name
    pub name: String,
    /// Material code, unique within the catalog
    pub code: String,
    /// Optional description
    pub description: Option<String>,
}

/// Loads the material catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the material catalog from the default location (./config.toml)
///
/// # Errors
/// Returns an error if the file is missing or fails to parse.
pub fn load_default_catalog() -> Result<Catalog> {
    load_catalog("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_material_catalog() {
        let toml_str = r#"
            [[materials]]
            name = "Aluminium"
            code = "ALU"
            description = "Rolled aluminium sheet"

            [[materials]]
            name = "PET"
            code = "PET"
        "#;

        let catalog: Catalog = toml::from_str(toml_str).unwrap();
        assert_eq!(catalog.materials.len(), 2);
        assert_eq!(catalog.materials[0].name, "Aluminium");
        assert_eq!(catalog.materials[0].code, "ALU");
        assert!(catalog.materials[1].description.is_none());
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog: Catalog = toml::from_str("").unwrap();
        assert!(catalog.materials.is_empty());
    }
}
