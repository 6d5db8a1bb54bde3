pub mod arrivals;
pub mod error;
pub mod health;

pub use error::{bad_request, upstream_error, ErrorResponse};

use std::sync::Arc;

use axum::Router;

use crate::arrivals::DisplayConfig;
use crate::feed::FeedProvider;
use crate::stops::StopDirectory;

pub fn router(
    provider: Arc<FeedProvider>,
    directory: Arc<StopDirectory>,
    display: DisplayConfig,
    trip_updates_url: String,
) -> Router {
    Router::new()
        .nest(
            "/arrivals",
            arrivals::router(provider, directory.clone(), display),
        )
        .nest("/health", health::router(directory, trip_updates_url))
}
