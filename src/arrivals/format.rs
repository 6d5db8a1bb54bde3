//! Arrival time display formatting.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

/// Waits at or beyond this many minutes render as wall-clock times.
const RELATIVE_CUTOFF_MINUTES: i64 = 60;

/// Unit label for relative minute counts. Deployments differ on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinuteLabel {
    Min,
    M,
}

impl MinuteLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MinuteLabel::Min => "min",
            MinuteLabel::M => "m",
        }
    }
}

/// Render an arrival timestamp relative to the request's captured "now".
///
/// A zero-minute wait renders as `"Now"`, waits under an hour as a minute
/// count, and anything further out as a 12-hour wall-clock time in `tz`
/// with a lower-case am/pm marker. The wait is clamped to zero so a race
/// between capturing "now" and formatting never surfaces a negative count.
pub fn format_arrival_time(
    arrival_ts: i64,
    now: DateTime<Utc>,
    tz: Tz,
    label: MinuteLabel,
) -> String {
    let minutes = (arrival_ts - now.timestamp()).max(0) / 60;
    if minutes >= RELATIVE_CUTOFF_MINUTES {
        // Timestamps outside chrono's representable range fall through to
        // the minute rendering below, keeping the function total.
        if let Some(dt) = DateTime::from_timestamp(arrival_ts, 0) {
            let local = dt.with_timezone(&tz);
            let (is_pm, hour) = local.hour12();
            let marker = if is_pm { "pm" } else { "am" };
            return format!("{}:{:02} {}", hour, local.minute(), marker);
        }
    }
    if minutes == 0 {
        "Now".to_string()
    } else {
        format!("{} {}", minutes, label.as_str())
    }
}
