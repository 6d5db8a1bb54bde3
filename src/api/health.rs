use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::stops::StopDirectory;

#[derive(Clone)]
pub struct HealthState {
    pub directory: Arc<StopDirectory>,
    pub trip_updates_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service is running
    pub healthy: bool,
    /// Number of entries in the stop reference table
    pub stop_count: usize,
    /// Configured GTFS-RT TripUpdates endpoint
    pub trip_updates_url: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        stop_count: state.directory.len(),
        trip_updates_url: state.trip_updates_url.clone(),
    })
}

pub fn router(directory: Arc<StopDirectory>, trip_updates_url: String) -> Router {
    let state = HealthState {
        directory,
        trip_updates_url,
    };
    Router::new()
        .route("/", get(health_check))
        .with_state(state)
}
