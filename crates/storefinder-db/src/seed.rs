use sqlx::PgPool;
use storefinder_core::SeedStore;

use crate::stores::{write::insert_store_with, NewStore};
use crate::DbError;

/// Insert every store from a seed file.
///
/// Returns the number of stores inserted. All inserts run inside a single
/// transaction; if any insert fails the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_stores(pool: &PgPool, stores: &[SeedStore]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for store in stores {
        let id = insert_store_with(&mut *tx, &NewStore::from_seed(store)).await?;
        tracing::debug!(%id, name = %store.name, "seeded store");
        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
