use serde::Deserialize;
use std::path::Path;

use crate::arrivals::format::MinuteLabel;
use crate::arrivals::DisplayConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// GTFS-RT feed configuration
    pub feed: FeedConfig,
    /// Display tuning for the arrivals pipeline
    #[serde(default)]
    pub display: DisplaySettings,
    /// Path to the stop reference CSV (stop_id,stop_name)
    #[serde(default = "Config::default_stops_file")]
    pub stops_file: String,
    #[serde(default = "Config::default_listen_addr")]
    pub listen_addr: String,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
}

impl Config {
    fn default_stops_file() -> String {
        "stops.csv".to_string()
    }

    fn default_listen_addr() -> String {
        "0.0.0.0:3000".to_string()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration for the GTFS-RT TripUpdates feed
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// TripUpdates endpoint (protobuf)
    pub trip_updates_url: String,
    /// Per-request fetch timeout in seconds (default: 30)
    #[serde(default = "FeedConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// IANA timezone for wall-clock rendering (default: America/Los_Angeles)
    #[serde(default = "FeedConfig::default_timezone")]
    pub timezone: String,
}

impl FeedConfig {
    fn default_timeout_secs() -> u64 {
        30
    }

    fn default_timezone() -> String {
        "America/Los_Angeles".to_string()
    }

    pub fn parsed_timezone(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!(
                timezone = %self.timezone,
                "Unknown timezone, falling back to America/Los_Angeles"
            );
            chrono_tz::America::Los_Angeles
        })
    }

    pub fn validate(&self) {
        if self.trip_updates_url.is_empty() {
            panic!("Feed configuration error: 'trip_updates_url' must be set");
        }
        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            panic!(
                "Feed configuration error: unknown timezone '{}'",
                self.timezone
            );
        }
    }
}

/// Display tuning for the arrivals pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySettings {
    /// Arrivals kept per stop in flat and single-stop responses (default: 8)
    #[serde(default = "DisplaySettings::default_max_arrivals")]
    pub max_arrivals: usize,
    /// Arrivals kept per route in grouped responses (default: 5)
    #[serde(default = "DisplaySettings::default_max_per_route")]
    pub max_per_route: usize,
    /// Relative minute unit label: "min" or "m" (default: "min")
    #[serde(default = "DisplaySettings::default_minute_label")]
    pub minute_label: MinuteLabel,
    /// Scan-buffer multiple of max_arrivals per stop (default: 3)
    #[serde(default = "DisplaySettings::default_overscan_multiple")]
    pub overscan_multiple: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_arrivals: Self::default_max_arrivals(),
            max_per_route: Self::default_max_per_route(),
            minute_label: Self::default_minute_label(),
            overscan_multiple: Self::default_overscan_multiple(),
        }
    }
}

impl DisplaySettings {
    fn default_max_arrivals() -> usize {
        8
    }

    fn default_max_per_route() -> usize {
        5
    }

    fn default_minute_label() -> MinuteLabel {
        MinuteLabel::Min
    }

    fn default_overscan_multiple() -> usize {
        3
    }

    pub fn display_config(&self, timezone: chrono_tz::Tz) -> DisplayConfig {
        DisplayConfig {
            max_arrivals: self.max_arrivals,
            max_per_route: self.max_per_route,
            minute_label: self.minute_label,
            overscan_multiple: self.overscan_multiple,
            timezone,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let yaml = "feed:\n  trip_updates_url: https://example.org/trip-updates.pb\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.feed.timeout_secs, 30);
        assert_eq!(config.feed.timezone, "America/Los_Angeles");
        assert_eq!(config.display.max_arrivals, 8);
        assert_eq!(config.display.max_per_route, 5);
        assert_eq!(config.display.minute_label, MinuteLabel::Min);
        assert_eq!(config.display.overscan_multiple, 3);
        assert_eq!(config.stops_file, "stops.csv");
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert!(config.cors_origins.is_empty());
        assert!(!config.cors_permissive);
    }

    #[test]
    fn parses_short_minute_label() {
        let yaml = "feed:\n  trip_updates_url: https://example.org/trip-updates.pb\ndisplay:\n  minute_label: m\n  max_per_route: 3\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.display.minute_label, MinuteLabel::M);
        assert_eq!(config.display.max_per_route, 3);
        assert_eq!(config.display.max_arrivals, 8);
    }

    #[test]
    fn unknown_timezone_falls_back() {
        let feed = FeedConfig {
            trip_updates_url: "https://example.org/trip-updates.pb".to_string(),
            timeout_secs: 30,
            timezone: "Mars/Olympus_Mons".to_string(),
        };
        assert_eq!(feed.parsed_timezone(), chrono_tz::America::Los_Angeles);
    }

    #[test]
    fn parsed_timezone_honors_config() {
        let feed = FeedConfig {
            trip_updates_url: "https://example.org/trip-updates.pb".to_string(),
            timeout_secs: 30,
            timezone: "America/Vancouver".to_string(),
        };
        assert_eq!(feed.parsed_timezone(), chrono_tz::America::Vancouver);
    }

    #[test]
    #[should_panic(expected = "trip_updates_url")]
    fn validate_rejects_empty_url() {
        let feed = FeedConfig {
            trip_updates_url: String::new(),
            timeout_secs: 30,
            timezone: "America/Los_Angeles".to_string(),
        };
        feed.validate();
    }
}
