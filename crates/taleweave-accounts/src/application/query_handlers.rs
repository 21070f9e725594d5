//! Query handlers for the User Accounts context.

use chrono::{DateTime, Utc};
use serde::Serialize;
use taleweave_core::error::DomainError;
use taleweave_core::repository::{EventRepository, is_foreign_stream};
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::events::ACCOUNTS_CONTEXT;

/// Read-only view of a user account.
#[derive(Debug, Serialize)]
pub struct UserView {
    /// The user identifier.
    pub user_id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Name shown next to contributions.
    pub display_name: String,
    /// Biography, if set.
    pub bio: Option<String>,
    /// When the account was registered.
    pub registered_at: Option<DateTime<Utc>>,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a registered user by ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the user is not registered or
/// the id names another context's stream.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_user_by_id(
    user_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<UserView, DomainError> {
    let stored_events = repo.load_events(user_id).await?;
    if is_foreign_stream(&stored_events, ACCOUNTS_CONTEXT) {
        return Err(DomainError::AggregateNotFound(user_id));
    }
    let account = command_handlers::reconstitute(user_id, &stored_events)?;
    let Some(username) = account.username.clone() else {
        return Err(DomainError::AggregateNotFound(user_id));
    };
    Ok(UserView {
        user_id,
        username,
        display_name: account.display_name.clone(),
        bio: account.bio.clone(),
        registered_at: account.registered_at,
        version: account.version,
    })
}

/// Whether `user_id` belongs to a registered user.
///
/// # Errors
///
/// Returns `DomainError` if event loading or deserialization fails.
pub async fn user_exists(user_id: Uuid, repo: &dyn EventRepository) -> Result<bool, DomainError> {
    match get_user_by_id(user_id, repo).await {
        Ok(_) => Ok(true),
        Err(DomainError::AggregateNotFound(_)) => Ok(false),
        Err(other) => Err(other),
    }
}
