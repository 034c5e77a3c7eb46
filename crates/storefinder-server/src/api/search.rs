use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use storefinder_core::{Coordinate, ProductSearch, SearchResult, StoreRecord};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    /// Product title to search for.
    pub q: String,
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
}

impl SearchQuery {
    fn origin(&self, req_id: &str) -> Result<Coordinate, ApiError> {
        let origin = Coordinate::new(self.lng, self.lat);
        if origin.is_in_range() {
            Ok(origin)
        } else {
            Err(ApiError::new(
                req_id,
                "validation_error",
                format!(
                    "lat must be within [-90, 90] and lng within [-180, 180], got lat={} lng={}",
                    self.lat, self.lng
                ),
            ))
        }
    }

    fn radius_km(&self, req_id: &str, default: f64) -> Result<f64, ApiError> {
        let radius = self.radius_km.unwrap_or(default);
        if radius.is_finite() && radius >= 0.0 {
            Ok(radius)
        } else {
            Err(ApiError::new(
                req_id,
                "validation_error",
                format!("radius_km must be a non-negative number, got {radius}"),
            ))
        }
    }
}

/// `GET /api/search`: stores near `(lat, lng)` stocking a product matching `q`.
pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<SearchResult>>>, ApiError> {
    let rid = &req_id.0;
    let pool = state.require_pool(rid)?;

    let Query(query) = query.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;
    let origin = query.origin(rid)?;
    let radius_km = query.radius_km(rid, state.default_radius_km)?;

    let stores: Vec<StoreRecord> = storefinder_db::list_stores_in_stock(pool)
        .await
        .map_err(|e| map_db_error(rid.clone(), &storefinder_db::DbError::from(e)))?
        .into_iter()
        .map(StoreRecord::from)
        .collect();

    let results = ProductSearch::new(&query.q, origin, radius_km).run(&stores);

    tracing::debug!(
        q = %query.q,
        lat = query.lat,
        lng = query.lng,
        radius_km,
        scanned = stores.len(),
        matched = results.len(),
        "product search"
    );

    Ok(Json(ApiResponse {
        data: results,
        meta: ResponseMeta::new(req_id.0),
    }))
}
