//! Response shaping for the HTTP boundary.
//!
//! Every requested stop yields exactly one entry, in request order, even
//! when nothing is upcoming — callers distinguish "nothing soon" from
//! "stop not recognized" by the empty list, never by absence.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::stops::StopDirectory;

use super::format::format_arrival_time;
use super::pipeline::{rank, rank_by_route, ArrivalCandidate};
use super::DisplayConfig;

/// One upcoming arrival, display-ready.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormattedArrival {
    pub route_id: String,
    /// Relative minute count or wall-clock time, e.g. "2 min" or "4:05 pm".
    pub arriving: String,
    /// Signed schedule deviation in seconds; 0 when upstream left it unset.
    pub deviation: i64,
}

/// Flat per-stop arrival list.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopArrivals {
    pub stop_id: String,
    pub arrivals: Vec<FormattedArrival>,
}

/// One bus in a route group.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Bus {
    /// Relative minute count or wall-clock time, e.g. "2 min" or "4:05 pm".
    pub arriving: String,
    /// Signed schedule deviation in seconds; 0 when upstream left it unset.
    pub delayed_by: i64,
}

/// A stop's upcoming buses for one route.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteBuses {
    pub route_id: String,
    pub buses: Vec<Bus>,
}

/// Per-stop, per-route grouped arrivals.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopRoutes {
    pub stop_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_name: Option<String>,
    pub routes: Vec<RouteBuses>,
}

/// Single-stop arrival list.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopArrivalsDetail {
    pub stop_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_name: Option<String>,
    pub arrivals: Vec<FormattedArrival>,
}

fn format_all(
    candidates: Vec<ArrivalCandidate>,
    now: DateTime<Utc>,
    config: &DisplayConfig,
) -> Vec<FormattedArrival> {
    candidates
        .into_iter()
        .map(|c| FormattedArrival {
            arriving: format_arrival_time(c.arrival_ts, now, config.timezone, config.minute_label),
            route_id: c.route_id,
            deviation: c.deviation_secs,
        })
        .collect()
}

/// Shape scanned buffers into the flat response, one entry per requested
/// stop in request order.
pub fn assemble_flat(
    requested: &[String],
    mut buffers: HashMap<String, Vec<ArrivalCandidate>>,
    now: DateTime<Utc>,
    config: &DisplayConfig,
) -> Vec<StopArrivals> {
    requested
        .iter()
        .map(|stop_id| {
            let ranked = rank(buffers.remove(stop_id).unwrap_or_default(), config);
            StopArrivals {
                stop_id: stop_id.clone(),
                arrivals: format_all(ranked, now, config),
            }
        })
        .collect()
}

/// Shape scanned buffers into the per-stop-per-route grouped response.
pub fn assemble_grouped(
    requested: &[String],
    mut buffers: HashMap<String, Vec<ArrivalCandidate>>,
    directory: &StopDirectory,
    now: DateTime<Utc>,
    config: &DisplayConfig,
) -> Vec<StopRoutes> {
    requested
        .iter()
        .map(|stop_id| {
            let groups = rank_by_route(buffers.remove(stop_id).unwrap_or_default(), config);
            StopRoutes {
                stop_id: stop_id.clone(),
                stop_name: directory.name(stop_id).map(str::to_string),
                routes: groups
                    .into_iter()
                    .map(|group| RouteBuses {
                        route_id: group.route_id,
                        buses: group
                            .arrivals
                            .into_iter()
                            .map(|c| Bus {
                                arriving: format_arrival_time(
                                    c.arrival_ts,
                                    now,
                                    config.timezone,
                                    config.minute_label,
                                ),
                                delayed_by: c.deviation_secs,
                            })
                            .collect(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Shape one stop's buffer into the single-stop response.
pub fn assemble_detail(
    stop_id: &str,
    buffer: Vec<ArrivalCandidate>,
    directory: &StopDirectory,
    now: DateTime<Utc>,
    config: &DisplayConfig,
) -> StopArrivalsDetail {
    StopArrivalsDetail {
        stop_id: stop_id.to_string(),
        stop_name: directory.name(stop_id).map(str::to_string),
        arrivals: format_all(rank(buffer, config), now, config),
    }
}
