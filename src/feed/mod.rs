//! GTFS-realtime feed provider.
//!
//! Fetches one TripUpdates snapshot per request and decodes it with prost.
//! The fetch is the only suspension point in a request; the arrivals
//! pipeline downstream is fully synchronous. One attempt, no retries: any
//! failure here is the whole request's upstream-failure outcome.

pub mod error;

use prost::Message;
use tracing::debug;

use crate::config::FeedConfig;

use error::FeedError;

/// Maximum allowed protobuf response size (50 MB)
const MAX_PROTOBUF_SIZE: usize = 50 * 1024 * 1024;

pub struct FeedProvider {
    client: reqwest::Client,
    config: FeedConfig,
}

impl FeedProvider {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent("nextbus-api/0.1")
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch and decode one snapshot of the TripUpdates feed.
    pub async fn fetch_trip_updates(&self) -> Result<gtfs_realtime::FeedMessage, FeedError> {
        let response = self
            .client
            .get(&self.config.trip_updates_url)
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::NetworkMessage(format!(
                "GTFS-RT HTTP {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;

        if bytes.len() > MAX_PROTOBUF_SIZE {
            return Err(FeedError::NetworkMessage(format!(
                "GTFS-RT response too large: {} bytes (max {} bytes)",
                bytes.len(),
                MAX_PROTOBUF_SIZE
            )));
        }

        let feed = gtfs_realtime::FeedMessage::decode(bytes.as_ref())?;
        debug!(entities = feed.entity.len(), "Decoded trip-update feed");
        Ok(feed)
    }
}
