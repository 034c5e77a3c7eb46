use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, GeoPoint};
use crate::inventory::InventoryEntry;
use crate::SeedError;

/// A store definition from a seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedStore {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
}

impl SeedStore {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }

    #[must_use]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.coordinate())
    }
}

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub stores: Vec<SeedStore>,
}

/// Load and validate a store seed file (YAML).
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_file(path: &Path) -> Result<SeedFile, SeedError> {
    let content = std::fs::read_to_string(path).map_err(|e| SeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_seed_file(&content)
}

/// Parse and validate seed file contents.
///
/// # Errors
///
/// Returns `SeedError` if the YAML is invalid or a store fails validation.
pub fn parse_seed_file(content: &str) -> Result<SeedFile, SeedError> {
    let seed_file: SeedFile = serde_yaml::from_str(content).map_err(SeedError::Parse)?;
    validate_stores(&seed_file.stores)?;
    Ok(seed_file)
}

fn validate_stores(stores: &[SeedStore]) -> Result<(), SeedError> {
    for store in stores {
        if store.name.trim().is_empty() {
            return Err(SeedError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if !store.coordinate().is_in_range() {
            return Err(SeedError::Validation(format!(
                "store '{}' has out-of-range coordinates ({}, {})",
                store.name, store.longitude, store.latitude
            )));
        }

        if let Some(entry) = store
            .inventory
            .iter()
            .find(|e| !e.price.is_finite() || e.price < 0.0)
        {
            return Err(SeedError::Validation(format!(
                "store '{}' lists '{}' with invalid price {}",
                store.name, entry.product_title, entry.price
            )));
        }
    }

    Ok(())
}
