//! Store registry handlers: create, list, fetch.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefinder_core::{GeoPoint, InventoryEntry};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CreateStoreRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    /// Untyped so a wrong shape yields a validation error, not a decode error.
    pub location: serde_json::Value,
    /// Items are read the same way stored inventory is: missing or odd
    /// fields fall back to an empty title, zero quantity, or zero price.
    #[serde(default)]
    pub inventory: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateStoreResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub location: serde_json::Value,
    pub inventory: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<storefinder_db::StoreRow> for StoreItem {
    fn from(row: storefinder_db::StoreRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name,
            address: row.address,
            city: row.city,
            country: row.country,
            location: row.location,
            inventory: row.inventory,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_location(req_id: &str, location: &serde_json::Value) -> Result<GeoPoint, ApiError> {
    GeoPoint::from_value(location).ok_or_else(|| {
        ApiError::new(
            req_id,
            "validation_error",
            "invalid location; expected GeoJSON Point with [lng, lat]",
        )
    })
}

fn validate_inventory(
    req_id: &str,
    items: &[serde_json::Value],
) -> Result<Vec<InventoryEntry>, ApiError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let entry = InventoryEntry::from_value(item).ok_or_else(|| {
                ApiError::new(
                    req_id,
                    "validation_error",
                    format!("inventory[{index}] must be an object"),
                )
            })?;
            if entry.price.is_finite() && entry.price >= 0.0 {
                Ok(entry)
            } else {
                Err(ApiError::new(
                    req_id,
                    "validation_error",
                    format!("inventory[{index}].price must be a non-negative number"),
                ))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/stores`: register a store with its location and inventory.
pub(super) async fn create_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CreateStoreRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreateStoreResponse>>), ApiError> {
    let rid = &req_id.0;
    let pool = state.require_pool(rid)?;

    let Json(body) = body.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;

    let name = body.name.trim().to_owned();
    if name.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "name must not be blank"));
    }
    let location = validate_location(rid, &body.location)?;
    let inventory = validate_inventory(rid, &body.inventory)?;

    let new_store = storefinder_db::NewStore {
        name,
        address: body.address,
        city: body.city,
        country: body.country,
        location,
        inventory,
    };

    let id = storefinder_db::insert_store(pool, &new_store)
        .await
        .map_err(|e| map_db_error(rid.clone(), &storefinder_db::DbError::from(e)))?;

    tracing::info!(store_id = %id, name = %new_store.name, "store created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreateStoreResponse { id: id.to_string() },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/stores`: every registered store.
pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<StoreItem>>>, ApiError> {
    let pool = state.require_pool(&req_id.0)?;

    let rows = storefinder_db::list_stores(pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &storefinder_db::DbError::from(e)))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(StoreItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/stores/{id}`: one store.
pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StoreItem>>, ApiError> {
    let rid = &req_id.0;
    let pool = state.require_pool(rid)?;

    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::new(rid, "validation_error", format!("'{id}' is not a valid store id")))?;

    let row = storefinder_db::get_store(pool, id)
        .await
        .map_err(|e| match e {
            storefinder_db::DbError::NotFound => {
                ApiError::new(rid, "not_found", format!("store '{id}' not found"))
            }
            other => map_db_error(rid.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: StoreItem::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}
