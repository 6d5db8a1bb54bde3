mod list;

pub use list::*;

use std::sync::Arc;

use axum::http::header::{self, HeaderValue};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::arrivals::DisplayConfig;
use crate::feed::FeedProvider;
use crate::stops::StopDirectory;

#[derive(Clone)]
pub struct ArrivalsState {
    pub provider: Arc<FeedProvider>,
    pub directory: Arc<StopDirectory>,
    pub display: DisplayConfig,
}

pub fn router(
    provider: Arc<FeedProvider>,
    directory: Arc<StopDirectory>,
    display: DisplayConfig,
) -> Router {
    let state = ArrivalsState {
        provider,
        directory,
        display,
    };
    Router::new()
        .route("/", post(list_arrivals))
        .route("/by-route", post(list_arrivals_by_route))
        .route("/{stop_id}", get(get_stop_arrivals))
        // Real-time data goes stale quickly; keep intermediary caching short.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=15"),
        ))
        .with_state(state)
}
