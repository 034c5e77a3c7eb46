//! Write operations for the `stores` table.

use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::types::NewStore;

/// Insert a store and return its generated id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn insert_store(pool: &PgPool, store: &NewStore) -> Result<Uuid, sqlx::Error> {
    insert_store_with(pool, store).await
}

pub(crate) async fn insert_store_with<'e, E>(executor: E, store: &NewStore) -> Result<Uuid, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO stores (name, address, city, country, location, inventory) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(&store.name)
    .bind(&store.address)
    .bind(&store.city)
    .bind(&store.country)
    .bind(Json(&store.location))
    .bind(Json(&store.inventory))
    .fetch_one(executor)
    .await
}
