//! Command handlers for the Story Collaboration context.
//!
//! Every handler follows the same shape: load the story's stream, rebuild the
//! aggregate, run the domain method, append at the loaded version, and only
//! then publish notifications. A concurrent writer that appended first makes
//! the append fail with `DomainError::ConcurrencyConflict`, so two commands
//! can never both act on the same turn or the same invitation.

use taleweave_accounts::application::query_handlers::user_exists;
use taleweave_core::aggregate::AggregateRoot;
use taleweave_core::clock::Clock;
use taleweave_core::command::Command;
use taleweave_core::error::DomainError;
use taleweave_core::repository::{EventRepository, StoredEvent, is_foreign_stream};
use taleweave_notifications::Notifier;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::notifications::notifications_for;
use crate::domain::aggregates::Story;
use crate::domain::commands::{
    AcceptInvitation, ApproveJoinRequest, CreateStory, DeclineInvitation, DeleteStory,
    DenyJoinRequest, InviteParticipant, RequestToJoin, SubmitSegment, UpdateStorySettings,
};
use crate::domain::events::{STORIES_CONTEXT, StoryEvent, StoryEventKind};

/// Outcome of a successfully handled story command.
#[derive(Debug, Clone)]
pub struct StoryCommandResult {
    /// The story the events were appended to.
    pub aggregate_id: Uuid,
    /// The events as persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// Reconstitutes a `Story` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    story_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Story, DomainError> {
    let mut story = Story::new(story_id);
    for stored in existing_events {
        let kind: StoryEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        let event = StoryEvent {
            metadata: stored.metadata(),
            kind,
        };
        story.apply(&event);
    }
    Ok(story)
}

/// Loads a story that must exist and not be deleted. An id naming another
/// context's stream counts as unknown.
pub(crate) async fn load_existing(
    story_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Story, DomainError> {
    let existing_events = repo.load_events(story_id).await?;
    if is_foreign_stream(&existing_events, STORIES_CONTEXT) {
        return Err(DomainError::AggregateNotFound(story_id));
    }
    let story = reconstitute(story_id, &existing_events)?;
    if !story.exists() {
        return Err(DomainError::AggregateNotFound(story_id));
    }
    Ok(story)
}

async fn commit(
    mut story: Story,
    actor_id: Uuid,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    let stored_events: Vec<StoredEvent> = story
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect();

    repo.append_events(story.id, story.version(), &stored_events)
        .await?;

    for notification in notifications_for(&story, story.uncommitted_events(), actor_id) {
        notifier.notify(notification);
    }
    story.clear_uncommitted_events();

    Ok(StoryCommandResult {
        aggregate_id: story.id,
        stored_events,
    })
}

/// Handles the `CreateStory` command.
///
/// # Errors
///
/// Returns `DomainError::Conflict` if the story ID is already in use by any
/// stream or equals the author's user ID, `DomainError::Validation` for
/// invalid settings, or `DomainError` if event loading or appending fails.
pub async fn handle_create_story(
    command: &CreateStory,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(command = command.command_type(), story_id = %command.story_id, "handling command");

    if command.story_id == command.author_id {
        return Err(DomainError::Conflict(format!(
            "id {} belongs to the author and cannot name a story",
            command.story_id
        )));
    }
    let existing_events = repo.load_events(command.story_id).await?;
    if !existing_events.is_empty() {
        return Err(DomainError::Conflict(format!(
            "id {} is already in use",
            command.story_id
        )));
    }
    let mut story = Story::new(command.story_id);

    story.create(
        command.author_id,
        command.settings.clone(),
        command.correlation_id,
        clock,
    )?;

    let result = commit(story, command.author_id, repo, notifier).await?;
    info!(story_id = %command.story_id, author_id = %command.author_id, "story created");
    Ok(result)
}

/// Handles the `UpdateStorySettings` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or deleted stories,
/// `DomainError::Forbidden` for non-authors, `DomainError::Conflict` once
/// complete, `DomainError::Validation` for invalid settings, or `DomainError`
/// if event loading or appending fails.
pub async fn handle_update_story_settings(
    command: &UpdateStorySettings,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(command = command.command_type(), story_id = %command.story_id, "handling command");

    let mut story = load_existing(command.story_id, repo).await?;
    story.update_settings(
        command.actor_id,
        command.settings.clone(),
        command.correlation_id,
        clock,
    )?;

    commit(story, command.actor_id, repo, notifier).await
}

/// Handles the `SubmitSegment` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or deleted stories,
/// `DomainError::Conflict` once complete or when another submission won the
/// race, `DomainError::Forbidden` when it is not the actor's turn,
/// `DomainError::Validation` for empty or oversized content, or `DomainError`
/// if event loading or appending fails.
pub async fn handle_submit_segment(
    command: &SubmitSegment,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(
        command = command.command_type(),
        story_id = %command.story_id,
        actor_id = %command.actor_id,
        "handling command"
    );

    let mut story = load_existing(command.story_id, repo).await?;
    story.submit_segment(
        command.actor_id,
        command.segment_id,
        &command.content,
        command.correlation_id,
        clock,
    )?;

    let result = commit(story, command.actor_id, repo, notifier).await?;
    info!(
        story_id = %command.story_id,
        segment_id = %command.segment_id,
        "segment submitted"
    );
    Ok(result)
}

/// Handles the `InviteParticipant` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or deleted stories,
/// `DomainError::Forbidden` for non-authors, `DomainError::Validation` for a
/// self-invitation, `DomainError::NotFound` when the invitee is not a
/// registered user, `DomainError::Conflict` when the invitee already
/// participates or is already invited, or `DomainError` if event loading or
/// appending fails.
pub async fn handle_invite_participant(
    command: &InviteParticipant,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(
        command = command.command_type(),
        story_id = %command.story_id,
        invitee_id = %command.invitee_id,
        "handling command"
    );

    let mut story = load_existing(command.story_id, repo).await?;
    story.invite(
        command.actor_id,
        command.invitation_id,
        command.invitee_id,
        command.correlation_id,
        clock,
    )?;
    if !user_exists(command.invitee_id, repo).await? {
        return Err(DomainError::NotFound(format!(
            "user {}",
            command.invitee_id
        )));
    }

    commit(story, command.actor_id, repo, notifier).await
}

/// Handles the `AcceptInvitation` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or deleted stories,
/// `DomainError::NotFound` for an unknown invitation,
/// `DomainError::Forbidden` if the actor is not the invitee,
/// `DomainError::Conflict` if the invitation was already answered, or
/// `DomainError` if event loading or appending fails.
pub async fn handle_accept_invitation(
    command: &AcceptInvitation,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(
        command = command.command_type(),
        story_id = %command.story_id,
        invitation_id = %command.invitation_id,
        "handling command"
    );

    let mut story = load_existing(command.story_id, repo).await?;
    story.accept_invitation(
        command.actor_id,
        command.invitation_id,
        command.correlation_id,
        clock,
    )?;

    let result = commit(story, command.actor_id, repo, notifier).await?;
    info!(story_id = %command.story_id, user_id = %command.actor_id, "invitation accepted");
    Ok(result)
}

/// Handles the `DeclineInvitation` command.
///
/// # Errors
///
/// Returns the same errors as [`handle_accept_invitation`].
pub async fn handle_decline_invitation(
    command: &DeclineInvitation,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(
        command = command.command_type(),
        story_id = %command.story_id,
        invitation_id = %command.invitation_id,
        "handling command"
    );

    let mut story = load_existing(command.story_id, repo).await?;
    story.decline_invitation(
        command.actor_id,
        command.invitation_id,
        command.correlation_id,
        clock,
    )?;

    commit(story, command.actor_id, repo, notifier).await
}

/// Handles the `RequestToJoin` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or deleted stories,
/// `DomainError::Forbidden` for private stories, `DomainError::Conflict` for
/// participants, duplicate pending requests and completed stories, or
/// `DomainError` if event loading or appending fails.
pub async fn handle_request_to_join(
    command: &RequestToJoin,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(
        command = command.command_type(),
        story_id = %command.story_id,
        actor_id = %command.actor_id,
        "handling command"
    );

    let mut story = load_existing(command.story_id, repo).await?;
    story.request_to_join(
        command.actor_id,
        command.request_id,
        command.correlation_id,
        clock,
    )?;

    commit(story, command.actor_id, repo, notifier).await
}

/// Handles the `ApproveJoinRequest` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or deleted stories,
/// `DomainError::Forbidden` for non-authors, `DomainError::NotFound` for an
/// unknown request, `DomainError::Conflict` if already decided, or
/// `DomainError` if event loading or appending fails.
pub async fn handle_approve_join_request(
    command: &ApproveJoinRequest,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(
        command = command.command_type(),
        story_id = %command.story_id,
        request_id = %command.request_id,
        "handling command"
    );

    let mut story = load_existing(command.story_id, repo).await?;
    story.approve_join_request(
        command.actor_id,
        command.request_id,
        command.correlation_id,
        clock,
    )?;

    let result = commit(story, command.actor_id, repo, notifier).await?;
    info!(story_id = %command.story_id, request_id = %command.request_id, "join request approved");
    Ok(result)
}

/// Handles the `DenyJoinRequest` command.
///
/// # Errors
///
/// Returns the same errors as [`handle_approve_join_request`].
pub async fn handle_deny_join_request(
    command: &DenyJoinRequest,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(
        command = command.command_type(),
        story_id = %command.story_id,
        request_id = %command.request_id,
        "handling command"
    );

    let mut story = load_existing(command.story_id, repo).await?;
    story.deny_join_request(
        command.actor_id,
        command.request_id,
        command.correlation_id,
        clock,
    )?;

    commit(story, command.actor_id, repo, notifier).await
}

/// Handles the `DeleteStory` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or already deleted
/// stories, `DomainError::Forbidden` for non-authors, or `DomainError` if
/// event loading or appending fails.
pub async fn handle_delete_story(
    command: &DeleteStory,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    notifier: &dyn Notifier,
) -> Result<StoryCommandResult, DomainError> {
    debug!(command = command.command_type(), story_id = %command.story_id, "handling command");

    let mut story = load_existing(command.story_id, repo).await?;
    story.delete(command.actor_id, command.correlation_id, clock)?;

    let result = commit(story, command.actor_id, repo, notifier).await?;
    info!(story_id = %command.story_id, "story deleted");
    Ok(result)
}
