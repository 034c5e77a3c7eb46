use storefinder_core::{Coordinate, StoreRecord};

/// Run a product search against the database and print the ranked rows as
/// pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the origin or radius is invalid, or the store query
/// fails.
pub(crate) async fn run_search(
    pool: &sqlx::PgPool,
    query: &str,
    lat: f64,
    lng: f64,
    radius_km: f64,
) -> anyhow::Result<()> {
    let origin = validate_origin(lat, lng)?;
    anyhow::ensure!(
        radius_km.is_finite() && radius_km >= 0.0,
        "radius must be a non-negative number, got {radius_km}"
    );

    let stores: Vec<StoreRecord> = storefinder_db::list_stores_in_stock(pool)
        .await?
        .into_iter()
        .map(StoreRecord::from)
        .collect();

    let results = storefinder_core::search_products(&stores, query, origin, radius_km);
    tracing::debug!(
        scanned = stores.len(),
        matched = results.len(),
        "search complete"
    );

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn validate_origin(lat: f64, lng: f64) -> anyhow::Result<Coordinate> {
    let origin = Coordinate::new(lng, lat);
    anyhow::ensure!(
        origin.is_in_range(),
        "lat must be within [-90, 90] and lng within [-180, 180], got lat={lat} lng={lng}"
    );
    Ok(origin)
}
