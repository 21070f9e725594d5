//! Command handlers for the User Accounts context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.

use taleweave_core::aggregate::AggregateRoot;
use taleweave_core::clock::Clock;
use taleweave_core::command::Command;
use taleweave_core::error::DomainError;
use taleweave_core::repository::{EventRepository, StoredEvent, is_foreign_stream};
use tracing::debug;
use uuid::Uuid;

use crate::domain::aggregates::UserAccount;
use crate::domain::commands::{RegisterUser, UpdateProfile};
use crate::domain::events::{ACCOUNTS_CONTEXT, AccountEvent, AccountEventKind};

/// Reconstitutes a `UserAccount` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    user_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<UserAccount, DomainError> {
    let mut account = UserAccount::new(user_id);
    for stored in existing_events {
        let kind: AccountEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = AccountEvent {
            metadata: stored.metadata(),
            kind,
        };
        account.apply(&event);
    }
    Ok(account)
}

async fn persist(
    account: &UserAccount,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = account
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect();

    repo.append_events(account.id, account.version(), &stored_events)
        .await?;

    Ok(stored_events)
}

/// Handles the `RegisterUser` command: checks the stream is unused, registers
/// the account, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError::Conflict` if the user already exists or the id names
/// another context's stream,
/// `DomainError::Validation` for malformed fields, or `DomainError` if event
/// loading or appending fails.
pub async fn handle_register_user(
    command: &RegisterUser,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    debug!(command = command.command_type(), user_id = %command.user_id, "handling command");

    let existing_events = repo.load_events(command.user_id).await?;
    if is_foreign_stream(&existing_events, ACCOUNTS_CONTEXT) {
        return Err(DomainError::Conflict(format!(
            "id {} is already in use",
            command.user_id
        )));
    }
    let mut account = reconstitute(command.user_id, &existing_events)?;

    account.register(
        &command.username,
        &command.display_name,
        &command.email,
        command.correlation_id,
        clock,
    )?;

    persist(&account, repo).await
}

/// Handles the `UpdateProfile` command: reconstitutes the account, applies the
/// edit, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the user is not registered,
/// `DomainError::Forbidden` if the actor is someone else, or `DomainError` if
/// event loading or appending fails.
pub async fn handle_update_profile(
    command: &UpdateProfile,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    debug!(command = command.command_type(), user_id = %command.user_id, "handling command");

    let existing_events = repo.load_events(command.user_id).await?;
    if is_foreign_stream(&existing_events, ACCOUNTS_CONTEXT) {
        return Err(DomainError::AggregateNotFound(command.user_id));
    }
    let mut account = reconstitute(command.user_id, &existing_events)?;
    if !account.is_registered() {
        return Err(DomainError::AggregateNotFound(command.user_id));
    }

    account.update_profile(
        command.actor_id,
        &command.display_name,
        command.bio.as_deref(),
        command.correlation_id,
        clock,
    )?;

    persist(&account, repo).await
}
