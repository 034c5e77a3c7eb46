//! Row types for the `stores` table.

use chrono::{DateTime, Utc};
use storefinder_core::{GeoPoint, InventoryEntry, SeedStore, StoreRecord};
use uuid::Uuid;

/// Input record for inserting a store.
///
/// Location and inventory are typed here; they are written as JSONB
/// documents and read back untyped in [`StoreRow`].
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub location: GeoPoint,
    pub inventory: Vec<InventoryEntry>,
}

impl NewStore {
    #[must_use]
    pub fn from_seed(store: &SeedStore) -> Self {
        Self {
            name: store.name.clone(),
            address: store.address.clone(),
            city: store.city.clone(),
            country: store.country.clone(),
            location: store.location(),
            inventory: store.inventory.clone(),
        }
    }
}

/// A row from the `stores` table.
///
/// `location` and `inventory` come back as raw JSON; rows written before
/// validation existed may not have the expected shape.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub location: serde_json::Value,
    pub inventory: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<StoreRow> for StoreRecord {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            address: row.address,
            city: row.city,
            country: row.country,
            location: row.location,
            inventory: row.inventory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefinder_core::Coordinate;

    #[test]
    fn store_row_converts_to_record_with_string_id() {
        let id = Uuid::new_v4();
        let row = StoreRow {
            id,
            name: "Corner Market".to_string(),
            address: "12 Elm St".to_string(),
            city: "Austin".to_string(),
            country: "US".to_string(),
            location: serde_json::json!({"type": "Point", "coordinates": [-97.74, 30.27]}),
            inventory: serde_json::json!([]),
            created_at: Utc::now(),
        };

        let record = StoreRecord::from(row);
        assert_eq!(record.id, id.to_string());
        assert_eq!(record.coordinate(), Some(Coordinate::new(-97.74, 30.27)));
    }

    #[test]
    fn new_store_from_seed_builds_point() {
        let seed = SeedStore {
            name: "Night Owl".to_string(),
            address: "9 Oak Ave".to_string(),
            city: String::new(),
            country: String::new(),
            longitude: -97.70,
            latitude: 30.30,
            inventory: vec![],
        };

        let store = NewStore::from_seed(&seed);
        assert_eq!(store.location.coordinate(), Coordinate::new(-97.70, 30.30));
        assert_eq!(
            store.location.to_value(),
            serde_json::json!({"type": "Point", "coordinates": [-97.70, 30.30]})
        );
    }
}
