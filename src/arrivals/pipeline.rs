//! Feed scan, grouping, and ranking.
//!
//! One synchronous pass over a decoded TripUpdates snapshot. The scan
//! admits only stop-time updates for requested stops with a specified,
//! strictly-future arrival time; everything else is skipped silently so a
//! noisy upstream feed never fails a request.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use gtfs_realtime::FeedMessage;
use tracing::debug;

use super::route::normalize_route;
use super::DisplayConfig;

/// GTFS-RT `ScheduleRelationship::SKIPPED` on a stop-time update.
const SCHEDULE_RELATIONSHIP_SKIPPED: i32 = 1;

/// One qualifying arrival. The timestamp is an internal sort key and is
/// never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalCandidate {
    pub route_id: String,
    pub arrival_ts: i64,
    pub deviation_secs: i64,
}

/// A stop's ranked arrivals for one route, earliest first.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    pub route_id: String,
    pub arrivals: Vec<ArrivalCandidate>,
}

/// Scan the feed once and accumulate future arrivals for the requested stops.
///
/// Every requested stop gets a buffer before the scan begins, so stops with
/// no matching updates still come back with an empty list. Each buffer is
/// capped at [`DisplayConfig::stop_buffer_cap`]; once every stop's buffer is
/// full, the remainder of the feed is not scanned. Feeds smaller than the
/// cap are scanned to completion.
pub fn collect_arrivals(
    feed: &FeedMessage,
    requested: &HashSet<String>,
    now: DateTime<Utc>,
    config: &DisplayConfig,
) -> HashMap<String, Vec<ArrivalCandidate>> {
    let mut buffers: HashMap<String, Vec<ArrivalCandidate>> = requested
        .iter()
        .map(|id| (id.clone(), Vec::new()))
        .collect();
    if buffers.is_empty() {
        return buffers;
    }

    let cap = config.stop_buffer_cap();
    let now_ts = now.timestamp();
    let mut unsatisfied = buffers.len();
    let mut trip_updates = 0u64;
    let mut admitted = 0u64;
    let mut exhausted = true;

    'scan: for entity in &feed.entity {
        let Some(trip_update) = &entity.trip_update else {
            continue;
        };
        trip_updates += 1;

        // Normalized once per trip update; every stop-time update below
        // shares the same route key.
        let route_id = normalize_route(trip_update.trip.route_id.as_deref().unwrap_or_default());

        for stu in &trip_update.stop_time_update {
            let Some(stop_id) = stu.stop_id.as_deref() else {
                continue;
            };
            let Some(buffer) = buffers.get_mut(stop_id) else {
                continue;
            };
            if stu.schedule_relationship == Some(SCHEDULE_RELATIONSHIP_SKIPPED) {
                continue;
            }
            let Some(arrival) = &stu.arrival else {
                continue;
            };
            let Some(arrival_ts) = arrival.time else {
                continue;
            };
            // Strictly future; an arrival at the captured instant is past.
            if arrival_ts <= now_ts {
                continue;
            }
            if buffer.len() >= cap {
                continue;
            }
            buffer.push(ArrivalCandidate {
                route_id: route_id.to_string(),
                arrival_ts,
                deviation_secs: arrival.delay.unwrap_or(0) as i64,
            });
            admitted += 1;
            if buffer.len() == cap {
                unsatisfied -= 1;
                if unsatisfied == 0 {
                    exhausted = false;
                    break 'scan;
                }
            }
        }
    }

    debug!(trip_updates, admitted, exhausted, "Scanned trip-update feed");

    buffers
}

/// Sort a stop's buffer by arrival time (stable on ties, preserving feed
/// order) and keep the first `max_arrivals`.
pub fn rank(mut buffer: Vec<ArrivalCandidate>, config: &DisplayConfig) -> Vec<ArrivalCandidate> {
    buffer.sort_by_key(|c| c.arrival_ts);
    buffer.truncate(config.max_arrivals);
    buffer
}

/// Sort a stop's buffer and nest it per route, keeping at most
/// `max_per_route` arrivals per route. Routes appear in order of their
/// earliest arrival; routes with no arrivals never appear.
pub fn rank_by_route(
    mut buffer: Vec<ArrivalCandidate>,
    config: &DisplayConfig,
) -> Vec<RouteGroup> {
    if config.max_per_route == 0 {
        return Vec::new();
    }
    buffer.sort_by_key(|c| c.arrival_ts);

    let mut groups: Vec<RouteGroup> = Vec::new();
    for candidate in buffer {
        match groups.iter_mut().find(|g| g.route_id == candidate.route_id) {
            Some(group) => {
                if group.arrivals.len() < config.max_per_route {
                    group.arrivals.push(candidate);
                }
            }
            None => groups.push(RouteGroup {
                route_id: candidate.route_id.clone(),
                arrivals: vec![candidate],
            }),
        }
    }
    groups
}
