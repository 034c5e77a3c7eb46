//! Geographic primitives: coordinates, GeoJSON point parsing, and
//! great-circle distance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sphere radius used for every distance in the service, in kilometers.
///
/// Not the WGS84 mean radius (6371 km). Published distances depend on this
/// exact value.
pub const EARTH_RADIUS_KM: f64 = 6367.0;

/// A `(longitude, latitude)` pair in decimal degrees.
///
/// Range validity is the caller's concern; the distance math accepts any
/// finite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns `true` when longitude is within `[-180, 180]` and latitude
    /// within `[-90, 90]`.
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }

    /// Reads the `coordinates` member of a stored GeoJSON-like location.
    ///
    /// Returns `None` unless `coordinates` is an array of exactly two numbers
    /// (`[lng, lat]`). The `type` tag is not inspected here; write paths
    /// enforce it with [`GeoPoint::from_value`].
    #[must_use]
    pub fn from_geojson(location: &Value) -> Option<Self> {
        let coords = location.get("coordinates")?.as_array()?;
        match coords.as_slice() {
            [lng, lat] => Some(Self::new(lng.as_f64()?, lat.as_f64()?)),
            _ => None,
        }
    }
}

/// A GeoJSON `Point` as accepted on store creation:
/// `{ "type": "Point", "coordinates": [lng, lat] }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    kind: PointTag,
    coordinates: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PointTag {
    Point,
}

impl GeoPoint {
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            kind: PointTag::Point,
            coordinates: [coordinate.longitude, coordinate.latitude],
        }
    }

    /// Validates an untyped location document.
    ///
    /// Returns `None` if the value is not an object tagged `"Point"` with a
    /// two-number `coordinates` array.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.get("type")?.as_str()? != "Point" {
            return None;
        }
        Coordinate::from_geojson(value).map(Self::new)
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.coordinates[0], self.coordinates[1])
    }

    /// Serializes back into the stored document shape.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "type": "Point",
            "coordinates": [self.coordinates[0], self.coordinates[1]],
        })
    }
}

/// Great-circle distance between two coordinates in kilometers, using the
/// haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair outside [0, 1] for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Rounds a kilometer value to two decimal places for presentation.
///
/// Exact halves round to the even hundredth (`10.125` becomes `10.12`).
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round_ties_even() / 100.0
}
