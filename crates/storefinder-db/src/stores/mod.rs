//! Database operations for the `stores` table.

mod read;
mod types;
pub(crate) mod write;

pub use read::{count_stores, get_store, list_stores, list_stores_in_stock};
pub use types::{NewStore, StoreRow};
pub use write::insert_store;
