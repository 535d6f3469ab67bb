use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    handlers::AppState,
    libraries::attendance_check::AttendanceChecker,
    models::{AttendanceCheckRequest, AttendanceCheckResponse, ErrorResponse},
};

/// Handle a staff check-in at a shelter
///
/// The sample must be valid, fresh and precise enough, and fall inside the
/// shelter's radius. Rejections are reported in the body with `success: false`
/// so the client can show the distance; only an unknown shelter is an HTTP error.
pub async fn check_attendance(
    State(state): State<AppState>,
    Json(request): Json<AttendanceCheckRequest>,
) -> Result<Json<AttendanceCheckResponse>, (StatusCode, Json<ErrorResponse>)> {
    let shelter = state.shelters.get(request.shelter_id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!(
                "Shelter {} not found",
                request.shelter_id
            ))),
        )
    })?;

    let radius = shelter.radius_or(state.config.default_radius_meters);
    let checker = AttendanceChecker::with_config(state.config.check_config());
    let result = checker.check(&request.sample, &shelter.location, radius);

    debug!(
        "Attendance check for shelter {} - passed: {}, accuracy: {:.1}m, age: {}ms",
        shelter.id, result.passed, result.accuracy, result.sample_age_ms
    );

    if !result.passed {
        return Ok(Json(AttendanceCheckResponse::rejected(&shelter, &result)));
    }

    let attendance_id = Uuid::new_v4();
    info!(
        "Recorded attendance {} at shelter {} from cell {}",
        attendance_id,
        shelter.id,
        request
            .sample
            .coordinates
            .geohash(7)
            .unwrap_or_else(|_| "unknown".to_string())
    );

    Ok(Json(AttendanceCheckResponse::accepted(
        &shelter,
        attendance_id,
        &result,
    )))
}
