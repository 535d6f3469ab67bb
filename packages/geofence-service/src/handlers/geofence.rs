use axum::{http::StatusCode, Json};
use tracing::debug;

use crate::{
    libraries::distance,
    models::{ErrorResponse, EvaluateGeofenceRequest, EvaluateGeofenceResponse},
};

/// Evaluate a position against an arbitrary target and radius
pub async fn evaluate_geofence(
    Json(request): Json<EvaluateGeofenceRequest>,
) -> Result<Json<EvaluateGeofenceResponse>, (StatusCode, Json<ErrorResponse>)> {
    for point in [&request.current, &request.target] {
        point
            .validate()
            .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))))?;
    }

    if !request.max_distance_meters.is_finite() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("maxDistanceMeters must be a finite number.")),
        ));
    }

    let result = distance::evaluate_geofence(
        &request.current,
        &request.target,
        request.max_distance_meters,
    );
    let bearing = distance::bearing_degrees(&request.current, &request.target);

    debug!(
        "Geofence evaluation - within: {}, distance: {:.1}m, max: {:.1}m",
        result.within_radius, result.distance_meters, result.max_distance_meters
    );

    Ok(Json(EvaluateGeofenceResponse::new(result, bearing)))
}
