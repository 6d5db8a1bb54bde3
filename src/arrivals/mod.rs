//! Arrival aggregation and ranking pipeline.
//!
//! Reduces one GTFS-RT TripUpdates snapshot to a small ranked list of
//! upcoming arrivals per requested stop. One configurable pipeline backs
//! every response shape: the flat per-stop lists, the per-stop-per-route
//! grouped lists, and the single-stop detail.

pub mod assemble;
pub mod format;
pub mod pipeline;
pub mod route;

use chrono_tz::Tz;

use format::MinuteLabel;

/// Per-deployment display parameters for the arrivals pipeline.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Arrivals kept per stop in flat and single-stop shapes.
    pub max_arrivals: usize,
    /// Arrivals kept per route in the grouped shape.
    pub max_per_route: usize,
    /// Unit label for relative minute counts.
    pub minute_label: MinuteLabel,
    /// Multiple of `max_arrivals` retained per stop during the feed scan.
    /// A buffer this size is assumed to contain the true top-N regardless
    /// of feed ordering; the bound is best-effort, not proven.
    pub overscan_multiple: usize,
    /// Civil time zone for wall-clock rendering.
    pub timezone: Tz,
}

impl DisplayConfig {
    /// Candidates retained per stop before the stop counts as satisfied
    /// for early exit.
    pub fn stop_buffer_cap(&self) -> usize {
        self.max_arrivals * self.overscan_multiple
    }
}
