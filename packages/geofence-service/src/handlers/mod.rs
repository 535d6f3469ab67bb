pub mod attendance;
pub mod geofence;
pub mod shelters;

use axum::{
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, services::shelter::ShelterService};

pub use attendance::check_attendance;
pub use geofence::evaluate_geofence;
pub use shelters::{get_shelter, list_shelters, register_shelter};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub shelters: Arc<ShelterService>,
}

impl AppState {
    pub fn new(config: Config, shelters: Arc<ShelterService>) -> Self {
        Self { config, shelters }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "geofence-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/geofence/evaluate", post(evaluate_geofence))
        .route("/api/attendance/check", post(check_attendance))
        .route("/api/shelters", get(list_shelters))
        .route("/api/shelters/:id", get(get_shelter).put(register_shelter))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
