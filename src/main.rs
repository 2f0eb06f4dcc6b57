//! Assetlog Server - equipment maintenance scheduling
//!
//! REST API server tracking equipment, preventive maintenance schedules
//! and the maintenance log.

use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assetlog_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Assetlog Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Upcoming threshold: {} days",
        config.maintenance.upcoming_threshold_days
    );

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), &config.maintenance);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        repository,
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global subscriber, pretty or JSON per configuration
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("assetlog_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Equipment
        .route("/equipment", get(api::equipment::list_equipment))
        .route("/equipment", post(api::equipment::create_equipment))
        .route("/equipment/:id", get(api::equipment::get_equipment))
        .route(
            "/equipment/:id/maintenance-status",
            get(api::equipment::maintenance_status),
        )
        // Schedules
        .route("/equipment/:id/schedules", get(api::schedules::list_schedules))
        .route("/equipment/:id/schedules", post(api::schedules::attach_schedule))
        .route("/equipment/:id/schedules", delete(api::schedules::detach_all))
        .route("/schedules/:id", put(api::schedules::update_schedule))
        .route("/schedules/:id", delete(api::schedules::detach_schedule))
        .route("/schedules/:id/deactivate", post(api::schedules::deactivate_schedule))
        // Maintenance log
        .route("/maintenance/preventive", post(api::maintenance::record_preventive))
        .route("/maintenance/corrective", post(api::maintenance::record_corrective))
        .route("/maintenance/due", get(api::maintenance::list_due))
        .route(
            "/equipment/:id/maintenance-events",
            get(api::maintenance::list_events),
        )
        // Decommissions
        .route(
            "/equipment/:id/decommission",
            post(api::decommissions::decommission_equipment),
        )
        .route(
            "/equipment/:id/decommission",
            get(api::decommissions::get_decommission),
        )
        .route("/decommissions", get(api::decommissions::list_decommissions))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
