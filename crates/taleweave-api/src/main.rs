//! Taleweave API server entry point.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use taleweave_api::config::AppConfig;
use taleweave_api::error::AppError;
use taleweave_api::state::AppState;
use taleweave_api::{app, telemetry};
use taleweave_core::clock::SystemClock;
use taleweave_event_store::pg_event_repository::PgEventRepository;
use taleweave_notifications::NotificationHub;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(
        otlp = config.otlp_endpoint.is_some(),
        "Starting Taleweave API server"
    );

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(AppError::from)?;
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(AppError::from)?;

    let app_state = AppState::new(
        pool.clone(),
        Arc::new(SystemClock),
        Arc::new(PgEventRepository::new(pool)),
        NotificationHub::default(),
    );

    // TODO: Replace CorsLayer::permissive() with the web client's origin once it has a fixed host.
    let router = app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::from)?;

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from);

    telemetry.shutdown();
    served?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
