use geo::{HaversineBearing, Point};

use crate::models::{GeoPoint, GeoSample, GeofenceResult};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Accuracy threshold applied when the caller has no stricter requirement
pub const DEFAULT_MAX_ACCURACY_METERS: f64 = 50.0;

/// Great-circle distance between two points in meters using the Haversine formula.
///
/// Inputs are expected to be valid WGS84 degrees; out-of-range values give a
/// meaningless number rather than an error.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Compare `current` against a circular fence of `max_distance_meters` around `target`.
/// The boundary is inclusive and a negative radius rejects every point.
pub fn evaluate_geofence(
    current: &GeoPoint,
    target: &GeoPoint,
    max_distance_meters: f64,
) -> GeofenceResult {
    GeofenceResult::new(haversine_distance(current, target), max_distance_meters)
}

/// Whether a sample is precise enough to be trusted for a geofence check
pub fn is_accurate_enough(sample: &GeoSample, max_accuracy_meters: f64) -> bool {
    sample.is_accurate_enough(max_accuracy_meters)
}

/// Initial bearing from one point to another in degrees, normalized to [0, 360)
pub fn bearing_degrees(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let bearing = Point::from(*from).haversine_bearing(Point::from(*to));
    (bearing + 360.0) % 360.0
}

/// Point reached by travelling `distance_meters` from `origin` along `bearing`.
///
/// Uses the same sphere as [`haversine_distance`] (`EARTH_RADIUS_METERS`), so the
/// distance back to `origin` equals `distance_meters` up to floating point error.
pub fn destination_point(origin: &GeoPoint, bearing: f64, distance_meters: f64) -> GeoPoint {
    let lat_rad = origin.latitude.to_radians();
    let lon_rad = origin.longitude.to_radians();
    let bearing_rad = bearing.to_radians();
    let angular_distance = distance_meters / EARTH_RADIUS_METERS;

    let new_lat_rad = (lat_rad.sin() * angular_distance.cos()
        + lat_rad.cos() * angular_distance.sin() * bearing_rad.cos())
    .asin();

    let new_lon_rad = lon_rad
        + (bearing_rad.sin() * angular_distance.sin() * lat_rad.cos())
            .atan2(angular_distance.cos() - lat_rad.sin() * new_lat_rad.sin());

    let longitude = (new_lon_rad.to_degrees() + 540.0) % 360.0 - 180.0;

    GeoPoint::new(new_lat_rad.to_degrees(), longitude)
}
