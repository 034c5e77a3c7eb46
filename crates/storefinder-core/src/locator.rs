//! Product search over a snapshot of store records.
//!
//! The locator is a single synchronous pass: every store is visited, stores
//! with unusable coordinates or no in-stock match are dropped, the rest are
//! filtered by radius, and one row per store is emitted for its cheapest
//! matching entry. Rows are ordered by distance, then price.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::{haversine_km, round_km, Coordinate};
use crate::inventory::{parse_inventory, TitleQuery};

/// Radius applied when a search does not specify one.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// A store as returned by the repository scan.
///
/// `location` and `inventory` are the stored documents, untouched. They are
/// parsed lazily by the locator so one malformed record cannot fail a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub location: Value,
    pub inventory: Value,
}

impl StoreRecord {
    /// The store's coordinate, or `None` when the stored location has no
    /// usable `[lng, lat]` pair.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_geojson(&self.location)
    }
}

/// One search hit: a store joined with its best matching inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub store_id: String,
    pub store_name: String,
    pub address: String,
    /// Distance from the searcher, rounded to two decimals.
    pub distance_km: f64,
    pub product_title: String,
    pub price: f64,
    pub quantity: u32,
}

/// Parameters of a product search.
#[derive(Debug, Clone)]
pub struct ProductSearch {
    query: TitleQuery,
    origin: Coordinate,
    radius_km: f64,
}

impl ProductSearch {
    #[must_use]
    pub fn new(query: &str, origin: Coordinate, radius_km: f64) -> Self {
        Self {
            query: TitleQuery::new(query),
            origin,
            radius_km,
        }
    }

    /// Evaluates a single store. `None` means the store is excluded.
    #[must_use]
    pub fn evaluate(&self, store: &StoreRecord) -> Option<SearchResult> {
        let Some(location) = store.coordinate() else {
            tracing::debug!(store_id = %store.id, "skipping store with malformed location");
            return None;
        };

        let inventory = parse_inventory(&store.inventory);
        let best = self.query.best_offer(&inventory)?;

        let distance = haversine_km(self.origin, location);
        if distance > self.radius_km {
            return None;
        }

        Some(SearchResult {
            store_id: store.id.clone(),
            store_name: store.name.clone(),
            address: store.address.clone(),
            distance_km: round_km(distance),
            product_title: best.product_title.clone(),
            price: best.price,
            quantity: best.quantity,
        })
    }

    /// Runs the search over `stores` and returns rows ordered by
    /// `(distance_km, price)`. Equal keys keep scan order.
    #[must_use]
    pub fn run<'a, I>(&self, stores: I) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = &'a StoreRecord>,
    {
        let mut results: Vec<SearchResult> =
            stores.into_iter().filter_map(|s| self.evaluate(s)).collect();
        sort_results(&mut results);
        results
    }
}

/// Convenience wrapper around [`ProductSearch`].
#[must_use]
pub fn search_products(
    stores: &[StoreRecord],
    query: &str,
    origin: Coordinate,
    radius_km: f64,
) -> Vec<SearchResult> {
    ProductSearch::new(query, origin, radius_km).run(stores)
}

fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.price.total_cmp(&b.price))
    });
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
