pub mod app_config;
pub mod config;
pub mod geo;
pub mod inventory;
pub mod locator;
pub mod seed;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_km, round_km, Coordinate, GeoPoint, EARTH_RADIUS_KM};
pub use inventory::{best_offer, matching_entries, parse_inventory, InventoryEntry, TitleQuery};
pub use locator::{search_products, ProductSearch, SearchResult, StoreRecord, DEFAULT_RADIUS_KM};
pub use seed::{load_seed_file, parse_seed_file, SeedFile, SeedStore};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seed file: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("seed validation failed: {0}")]
    Validation(String),
}
