//! Store inventory entries and product-title matching.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stock line embedded in a store's inventory.
///
/// Entries have no identity of their own; their position in the store's
/// inventory array is what distinguishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub product_title: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

impl InventoryEntry {
    /// Parses a stored inventory element.
    ///
    /// Stored documents are loosely shaped, so this is lenient the same way
    /// the search has always been: a missing title reads as `""`, a missing
    /// or non-numeric price reads as `0.0`, and a missing, negative, or
    /// non-numeric quantity reads as `0` (out of stock). Only non-object
    /// elements are rejected.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let product_title = match object.get("product_title") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let quantity = object.get("quantity").map_or(0, read_quantity);
        let price = object.get("price").and_then(Value::as_f64).unwrap_or(0.0);

        Some(Self {
            product_title,
            quantity,
            price,
        })
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn read_quantity(value: &Value) -> u32 {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).unwrap_or(u32::MAX);
    }
    match value.as_f64() {
        // Fractional stock counts truncate toward zero.
        Some(f) if f.is_finite() && f >= 1.0 => f.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Parses a stored inventory array, dropping elements that are not objects.
///
/// A non-array value yields an empty inventory.
#[must_use]
pub fn parse_inventory(value: &Value) -> Vec<InventoryEntry> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(InventoryEntry::from_value).collect())
        .unwrap_or_default()
}

/// A case-insensitive product-title query.
#[derive(Debug, Clone)]
pub struct TitleQuery {
    needle: String,
}

impl TitleQuery {
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// `true` when the entry is in stock and its title contains the query,
    /// ignoring case. An empty query matches every in-stock entry.
    #[must_use]
    pub fn matches(&self, entry: &InventoryEntry) -> bool {
        entry.in_stock() && entry.product_title.to_lowercase().contains(&self.needle)
    }

    /// The cheapest matching entry. On a price tie the earliest entry wins.
    #[must_use]
    pub fn best_offer<'a>(&self, entries: &'a [InventoryEntry]) -> Option<&'a InventoryEntry> {
        entries
            .iter()
            .filter(|entry| self.matches(entry))
            .fold(None, |best: Option<&InventoryEntry>, entry| match best {
                Some(current) if current.price <= entry.price => Some(current),
                _ => Some(entry),
            })
    }
}

/// Entries whose title contains `query` (case-insensitive) and that are in
/// stock, preserving order.
#[must_use]
pub fn matching_entries<'a>(entries: &'a [InventoryEntry], query: &str) -> Vec<&'a InventoryEntry> {
    let query = TitleQuery::new(query);
    entries.iter().filter(|entry| query.matches(entry)).collect()
}

/// Best offer for `query` among `entries`. See [`TitleQuery::best_offer`].
#[must_use]
pub fn best_offer<'a>(entries: &'a [InventoryEntry], query: &str) -> Option<&'a InventoryEntry> {
    TitleQuery::new(query).best_offer(entries)
}
