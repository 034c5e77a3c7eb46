//! Read operations for the `stores` table.

use sqlx::PgPool;
use uuid::Uuid;

use super::types::StoreRow;
use crate::DbError;

const STORE_COLUMNS: &str =
    "id, name, address, city, country, location, inventory, created_at";

/// Return every store, oldest first.
///
/// This is a full scan; search relies on it for a stable encounter order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores(pool: &PgPool) -> Result<Vec<StoreRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await
}

/// Return stores with at least one in-stock inventory entry, oldest first.
///
/// A coarse pre-filter for product search. Title matching stays with the
/// in-memory matcher, so the result is a superset of what any title query
/// can accept: an entry only reads as in stock when its `quantity` is a JSON
/// number of at least 1.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores_in_stock(pool: &PgPool) -> Result<Vec<StoreRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores s \
         WHERE EXISTS ( \
             SELECT 1 \
             FROM jsonb_array_elements( \
                 CASE WHEN jsonb_typeof(s.inventory) = 'array' \
                      THEN s.inventory ELSE '[]'::jsonb END \
             ) AS item \
             WHERE CASE WHEN jsonb_typeof(item->'quantity') = 'number' \
                        THEN (item->>'quantity')::numeric >= 1 \
                        ELSE FALSE END \
         ) \
         ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await
}

/// Fetch one store by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no store has that id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_store(pool: &PgPool, id: Uuid) -> Result<StoreRow, DbError> {
    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Count all stores.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_stores(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores")
        .fetch_one(pool)
        .await
}
