pub mod api;
mod arrivals;
mod config;
mod feed;
mod stops;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use feed::FeedProvider;
use stops::StopDirectory;

#[derive(OpenApi)]
#[openapi(
    info(title = "Next Bus API", version = "0.1.0"),
    paths(
        api::arrivals::list_arrivals,
        api::arrivals::list_arrivals_by_route,
        api::arrivals::get_stop_arrivals,
        api::health::health_check,
    ),
    components(schemas(
        api::ErrorResponse,
        api::arrivals::StopIdParam,
        api::arrivals::ArrivalsRequest,
        api::arrivals::ArrivalsResponse,
        api::arrivals::GroupedArrivalsResponse,
        arrivals::assemble::FormattedArrival,
        arrivals::assemble::StopArrivals,
        arrivals::assemble::Bus,
        arrivals::assemble::RouteBuses,
        arrivals::assemble::StopRoutes,
        arrivals::assemble::StopArrivalsDetail,
        api::health::HealthResponse,
    )),
    tags(
        (name = "arrivals", description = "Real-time arrival information"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");
    config.feed.validate();
    tracing::info!(feed = %config.feed.trip_updates_url, "Loaded configuration");

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode explicitly enabled (all origins allowed) - DO NOT USE IN PRODUCTION");
        CorsLayer::permissive()
    } else if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS: Restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        panic!("CORS configuration error: Either set 'cors_origins' with allowed origins, or set 'cors_permissive: true' for development");
    };

    // Load the stop reference table once; handlers receive it read-only
    let directory = Arc::new(
        StopDirectory::load(&config.stops_file).expect("Failed to load stop directory"),
    );

    let provider = Arc::new(
        FeedProvider::new(config.feed.clone()).expect("Failed to initialize feed provider"),
    );

    let display = config.display.display_config(config.feed.parsed_timezone());

    // Build the app
    let app = Router::new()
        .route("/", get(root))
        .nest(
            "/api",
            api::router(
                provider,
                directory,
                display,
                config.feed.trip_updates_url.clone(),
            ),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!(addr = %config.listen_addr, "Server running");
    tracing::info!("Swagger UI: /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn root() -> &'static str {
    "Next Bus API"
}
