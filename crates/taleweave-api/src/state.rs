//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;
use taleweave_core::clock::Clock;
use taleweave_core::repository::EventRepository;
use taleweave_notifications::NotificationHub;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// `PostgreSQL` connection pool.
    pub db_pool: PgPool,
    /// Clock for event timestamps.
    pub clock: Arc<dyn Clock>,
    /// Event store shared by every context.
    pub event_repository: Arc<dyn EventRepository>,
    /// Fan-out for user notifications.
    pub notifications: NotificationHub,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        db_pool: PgPool,
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        notifications: NotificationHub,
    ) -> Self {
        Self {
            db_pool,
            clock,
            event_repository,
            notifications,
        }
    }
}
