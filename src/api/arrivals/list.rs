use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::api::{bad_request, upstream_error, ErrorResponse};
use crate::arrivals::{assemble, pipeline};

use super::ArrivalsState;

/// A stop identifier from the request body. Some callers send numbers;
/// both forms are treated as strings.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StopIdParam {
    Text(String),
    Number(u64),
}

impl StopIdParam {
    fn into_string(self) -> String {
        match self {
            StopIdParam::Text(s) => s,
            StopIdParam::Number(n) => n.to_string(),
        }
    }
}

/// Deduplicate while preserving first-seen request order.
fn normalize_requested(stops: Vec<StopIdParam>) -> Vec<String> {
    let mut seen = HashSet::new();
    stops
        .into_iter()
        .map(StopIdParam::into_string)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ArrivalsRequest {
    /// Stops to report on, in the order results should be returned
    pub stops: Vec<StopIdParam>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArrivalsResponse {
    pub stops: Vec<assemble::StopArrivals>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupedArrivalsResponse {
    pub stops: Vec<assemble::StopRoutes>,
}

/// Upcoming arrivals for a set of stops, as flat per-stop lists
#[utoipa::path(
    post,
    path = "/api/arrivals",
    request_body = ArrivalsRequest,
    responses(
        (status = 200, description = "Ranked upcoming arrivals per requested stop", body = ArrivalsResponse),
        (status = 400, description = "No stops requested", body = ErrorResponse),
        (status = 502, description = "Upstream feed unavailable", body = ErrorResponse)
    ),
    tag = "arrivals"
)]
pub async fn list_arrivals(
    State(state): State<ArrivalsState>,
    Json(request): Json<ArrivalsRequest>,
) -> Result<Json<ArrivalsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let requested = normalize_requested(request.stops);
    if requested.is_empty() {
        return Err(bad_request("at least one stop id is required"));
    }

    let feed = state
        .provider
        .fetch_trip_updates()
        .await
        .map_err(upstream_error)?;

    // Captured once; admission and formatting both measure against it.
    let now = Utc::now();
    let stop_set: HashSet<String> = requested.iter().cloned().collect();
    let buffers = pipeline::collect_arrivals(&feed, &stop_set, now, &state.display);
    let stops = assemble::assemble_flat(&requested, buffers, now, &state.display);

    Ok(Json(ArrivalsResponse { stops }))
}

/// Upcoming arrivals for a set of stops, grouped per route
#[utoipa::path(
    post,
    path = "/api/arrivals/by-route",
    request_body = ArrivalsRequest,
    responses(
        (status = 200, description = "Upcoming arrivals per requested stop, nested per route", body = GroupedArrivalsResponse),
        (status = 400, description = "No stops requested", body = ErrorResponse),
        (status = 502, description = "Upstream feed unavailable", body = ErrorResponse)
    ),
    tag = "arrivals"
)]
pub async fn list_arrivals_by_route(
    State(state): State<ArrivalsState>,
    Json(request): Json<ArrivalsRequest>,
) -> Result<Json<GroupedArrivalsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let requested = normalize_requested(request.stops);
    if requested.is_empty() {
        return Err(bad_request("at least one stop id is required"));
    }

    let feed = state
        .provider
        .fetch_trip_updates()
        .await
        .map_err(upstream_error)?;

    let now = Utc::now();
    let stop_set: HashSet<String> = requested.iter().cloned().collect();
    let buffers = pipeline::collect_arrivals(&feed, &stop_set, now, &state.display);
    let stops = assemble::assemble_grouped(&requested, buffers, &state.directory, now, &state.display);

    Ok(Json(GroupedArrivalsResponse { stops }))
}

/// Upcoming arrivals for a single stop
#[utoipa::path(
    get,
    path = "/api/arrivals/{stop_id}",
    params(
        ("stop_id" = String, Path, description = "Stop identifier")
    ),
    responses(
        (status = 200, description = "Ranked upcoming arrivals for the stop", body = assemble::StopArrivalsDetail),
        (status = 502, description = "Upstream feed unavailable", body = ErrorResponse)
    ),
    tag = "arrivals"
)]
pub async fn get_stop_arrivals(
    State(state): State<ArrivalsState>,
    Path(stop_id): Path<String>,
) -> Result<Json<assemble::StopArrivalsDetail>, (StatusCode, Json<ErrorResponse>)> {
    let feed = state
        .provider
        .fetch_trip_updates()
        .await
        .map_err(upstream_error)?;

    let now = Utc::now();
    let mut stop_set = HashSet::new();
    stop_set.insert(stop_id.clone());
    let mut buffers = pipeline::collect_arrivals(&feed, &stop_set, now, &state.display);
    let buffer = buffers.remove(&stop_id).unwrap_or_default();

    Ok(Json(assemble::assemble_detail(
        &stop_id,
        buffer,
        &state.directory,
        now,
        &state.display,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_stop_ids_become_strings() {
        let request: ArrivalsRequest =
            serde_json::from_str(r#"{"stops": [101028, "101031"]}"#).unwrap();
        let requested = normalize_requested(request.stops);
        assert_eq!(requested, vec!["101028".to_string(), "101031".to_string()]);
    }

    #[test]
    fn duplicates_collapse_preserving_order() {
        let request: ArrivalsRequest =
            serde_json::from_str(r#"{"stops": ["b", "a", "b", 1, "1"]}"#).unwrap();
        let requested = normalize_requested(request.stops);
        assert_eq!(
            requested,
            vec!["b".to_string(), "a".to_string(), "1".to_string()]
        );
    }

    #[test]
    fn empty_request_normalizes_to_empty() {
        let request: ArrivalsRequest = serde_json::from_str(r#"{"stops": []}"#).unwrap();
        assert!(normalize_requested(request.stops).is_empty());
    }
}
