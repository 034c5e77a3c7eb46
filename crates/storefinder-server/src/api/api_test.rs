use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use storefinder_core::SearchResult;
use tower::ServiceExt;

fn generous_rate_limit() -> RateLimitState {
    RateLimitState::per_minute(1_000)
}

/// App with no store repository configured.
fn unconfigured_app() -> Router {
    build_app(AppState::new(None), generous_rate_limit())
}

/// App whose pool points at a closed port. Only usable for requests that are
/// rejected before any query runs.
fn unreachable_db_app() -> Router {
    let pool = storefinder_db::connect_pool_lazy(
        "postgres://storefinder@127.0.0.1:1/storefinder",
        storefinder_db::PoolConfig {
            min_connections: 0,
            ..storefinder_db::PoolConfig::default()
        },
    )
    .expect("lazy pool");
    build_app(AppState::new(Some(pool)), generous_rate_limit())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn store_body(location: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "name": "Corner Market",
        "address": "12 Elm St",
        "city": "Austin",
        "country": "US",
        "location": location,
        "inventory": [{"product_title": "Milk", "quantity": 5, "price": 2.5}]
    })
}

// -------------------------------------------------------------------------
// Envelope and error mapping
// -------------------------------------------------------------------------

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("bad_request", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("service_unavailable", StatusCode::SERVICE_UNAVAILABLE),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}

#[test]
fn search_result_serializes_wire_field_names() {
    let row = SearchResult {
        store_id: "abc".to_string(),
        store_name: "Corner Market".to_string(),
        address: "12 Elm St".to_string(),
        distance_km: 1.11,
        product_title: "Milk".to_string(),
        price: 2.5,
        quantity: 5,
    };
    let json = serde_json::to_value(&row).expect("serialize");
    for field in [
        "store_id",
        "store_name",
        "address",
        "distance_km",
        "product_title",
        "price",
        "quantity",
    ] {
        assert!(json.get(field).is_some(), "missing {field} in {json}");
    }
}

#[tokio::test]
async fn root_returns_banner() {
    let (status, json) = send(unconfigured_app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Store Finder API running");
}

#[tokio::test]
async fn request_id_header_is_echoed() {
    let response = unconfigured_app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "trace-me-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-me-123")
    );
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let response = unconfigured_app()
        .oneshot(get("/api/health"))
        .await
        .expect("response");
    let id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header");
    assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
}

// -------------------------------------------------------------------------
// Unconfigured repository
// -------------------------------------------------------------------------

#[tokio::test]
async fn health_without_database_is_degraded() {
    let (status, json) = send(unconfigured_app(), get("/api/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["data"]["status"], "degraded");
    assert_eq!(json["data"]["database"], "not_configured");
}

#[tokio::test]
async fn repository_routes_without_database_are_unavailable() {
    let requests = [
        get("/api/stores"),
        get("/api/stores/5f0c7c52-6a43-4d4e-9a4b-0d7c1e0e7a11"),
        get("/api/search?q=milk&lat=30.27&lng=-97.74"),
        post_json(
            "/api/stores",
            &store_body(serde_json::json!({"type": "Point", "coordinates": [-97.74, 30.27]})),
        ),
    ];

    for request in requests {
        let uri = request.uri().clone();
        let (status, json) = send(unconfigured_app(), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(json["error"]["code"], "service_unavailable", "{uri}");
        assert_eq!(json["error"]["message"], "database not configured", "{uri}");
    }
}

// -------------------------------------------------------------------------
// Store creation validation
// -------------------------------------------------------------------------

#[tokio::test]
async fn create_store_rejects_non_point_location() {
    let body = store_body(serde_json::json!({"type": "Polygon", "coordinates": [1.0, 2.0]}));
    let (status, json) = send(unreachable_db_app(), post_json("/api/stores", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn create_store_rejects_wrong_coordinate_count() {
    for coordinates in [
        serde_json::json!([1.0]),
        serde_json::json!([1.0, 2.0, 3.0]),
        serde_json::json!("1,2"),
    ] {
        let body = store_body(serde_json::json!({"type": "Point", "coordinates": coordinates}));
        let (status, json) = send(unreachable_db_app(), post_json("/api/stores", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{coordinates}");
        assert_eq!(json["error"]["code"], "validation_error", "{coordinates}");
    }
}

#[tokio::test]
async fn create_store_rejects_negative_price() {
    let mut body =
        store_body(serde_json::json!({"type": "Point", "coordinates": [-97.74, 30.27]}));
    body["inventory"] = serde_json::json!([
        {"product_title": "Milk", "quantity": 5, "price": 2.5},
        {"product_title": "Eggs", "quantity": 5, "price": -1.0}
    ]);
    let (status, json) = send(unreachable_db_app(), post_json("/api/stores", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(
        json["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("inventory[1]")),
        "{json}"
    );
}

#[tokio::test]
async fn create_store_rejects_blank_name() {
    let mut body =
        store_body(serde_json::json!({"type": "Point", "coordinates": [-97.74, 30.27]}));
    body["name"] = serde_json::json!("   ");
    let (status, json) = send(unreachable_db_app(), post_json("/api/stores", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn create_store_rejects_undecodable_body() {
    let body = serde_json::json!({"name": "Missing everything else"});
    let (status, json) = send(unreachable_db_app(), post_json("/api/stores", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn get_store_rejects_malformed_id() {
    let (status, json) = send(unreachable_db_app(), get("/api/stores/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

// -------------------------------------------------------------------------
// Search validation
// -------------------------------------------------------------------------

#[tokio::test]
async fn search_requires_query_and_coordinates() {
    for uri in [
        "/api/search?lat=30.27&lng=-97.74",
        "/api/search?q=milk&lng=-97.74",
        "/api/search?q=milk&lat=30.27",
        "/api/search?q=milk&lat=north&lng=-97.74",
    ] {
        let (status, json) = send(unreachable_db_app(), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["error"]["code"], "bad_request", "{uri}");
    }
}

#[tokio::test]
async fn search_rejects_out_of_range_origin() {
    let (status, json) = send(
        unreachable_db_app(),
        get("/api/search?q=milk&lat=91&lng=0"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn search_rejects_negative_radius() {
    let (status, json) = send(
        unreachable_db_app(),
        get("/api/search?q=milk&lat=30.27&lng=-97.74&radius_km=-5"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

// -------------------------------------------------------------------------
// Rate limiting
// -------------------------------------------------------------------------

#[tokio::test]
async fn rate_limit_rejects_excess_requests() {
    let app = build_app(AppState::new(None), RateLimitState::per_minute(1));

    let (first, _) = send(app.clone(), get("/api/stores")).await;
    assert_eq!(first, StatusCode::SERVICE_UNAVAILABLE);

    let (second, json) = send(
        app.clone(),
        Request::builder()
            .uri("/api/stores")
            .header("x-request-id", "burst-2")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"]["code"], "rate_limited");
    assert_eq!(json["error"]["message"], "rate limit exceeded");
    assert_eq!(json["meta"]["request_id"], "burst-2");
    assert!(json["meta"]["timestamp"].is_string(), "{json}");

    // Health stays outside the limiter.
    let (health, _) = send(app, get("/api/health")).await;
    assert_eq!(health, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn rate_limited_response_carries_generated_request_id() {
    let app = build_app(AppState::new(None), RateLimitState::per_minute(0));

    let response = app
        .oneshot(get("/api/search?q=milk&lat=0&lng=0"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let header_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header")
        .to_string();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
    assert_eq!(json["meta"]["request_id"], header_id.as_str());
}

// -------------------------------------------------------------------------
// End to end (with DB)
// -------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn created_stores_are_listed_and_searchable(pool: sqlx::PgPool) {
    let app = build_app(AppState::new(Some(pool)), generous_rate_limit());

    let near = serde_json::json!({
        "name": "Near Market",
        "address": "1 Near St",
        "city": "Austin",
        "country": "US",
        "location": {"type": "Point", "coordinates": [-97.7431, 30.2772]},
        "inventory": [
            {"product_title": "Milk", "quantity": 5, "price": 2.5},
            {"product_title": "milk chocolate", "quantity": 0, "price": 1.0},
            {"product_title": "Bread", "quantity": 1.5},
            {"quantity": -2, "price": 0.5}
        ]
    });
    let far = serde_json::json!({
        "name": "Far Market",
        "address": "1 Far St",
        "city": "Dallas",
        "country": "US",
        "location": {"type": "Point", "coordinates": [-96.7970, 32.7767]},
        "inventory": [{"product_title": "Milk", "quantity": 1, "price": 1.0}]
    });

    let (status, created) = send(app.clone(), post_json("/api/stores", &near)).await;
    assert_eq!(status, StatusCode::CREATED);
    let near_id = created["data"]["id"].as_str().expect("id").to_string();
    let (status, _) = send(app.clone(), post_json("/api/stores", &far)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = send(app.clone(), get("/api/stores")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(listed["data"][0]["id"], near_id.as_str());

    let (status, found) = send(
        app.clone(),
        get("/api/search?q=MILK&lat=30.2672&lng=-97.7431"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = found["data"].as_array().expect("data array");
    assert_eq!(rows.len(), 1, "{found}");
    assert_eq!(rows[0]["store_id"], near_id.as_str());
    assert_eq!(rows[0]["product_title"], "Milk");
    assert_eq!(rows[0]["distance_km"], 1.11);

    let (status, wide) = send(
        app,
        get("/api/search?q=milk&lat=30.2672&lng=-97.7431&radius_km=500"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wide["data"].as_array().map(Vec::len), Some(2));
}
