use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    handlers::AppState,
    models::{ErrorResponse, RegisterShelterRequest, Shelter},
};

pub async fn list_shelters(State(state): State<AppState>) -> Json<Vec<Shelter>> {
    Json(state.shelters.list().await)
}

pub async fn get_shelter(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Shelter>, (StatusCode, Json<ErrorResponse>)> {
    state.shelters.get(id).await.map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Shelter {} not found", id))),
        )
    })
}

/// Register or move a shelter's check-in point
pub async fn register_shelter(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<RegisterShelterRequest>,
) -> Result<(StatusCode, Json<Shelter>), (StatusCode, Json<ErrorResponse>)> {
    let shelter = request.into_shelter(id);

    let created = state
        .shelters
        .upsert(shelter.clone())
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))))?;

    info!(
        "{} shelter {} ({})",
        if created { "Registered" } else { "Updated" },
        shelter.id,
        shelter.name
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(shelter)))
}
