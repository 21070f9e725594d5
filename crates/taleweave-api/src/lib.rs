//! Taleweave: HTTP API.
//!
//! Axum routes over the accounts and stories contexts, the notification
//! stream, and the startup plumbing (configuration and telemetry) used by the
//! `taleweave-api` binary.

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/users", routes::users::router())
        .nest("/api/v1/stories", routes::stories::router())
        .nest("/api/v1/invitations", routes::invitations::router())
        .nest("/api/v1/events", routes::events::router())
        .with_state(state)
}
