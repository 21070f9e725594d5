//! Query handlers for the Story Collaboration context.
//!
//! Views are built by replaying the story stream on every read. Listing scans
//! the streams that contain a `StoryCreated` event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use taleweave_core::error::DomainError;
use taleweave_core::repository::EventRepository;
use uuid::Uuid;

use crate::application::command_handlers::{load_existing, reconstitute};
use crate::domain::aggregates::{
    Invitation, InvitationStatus, JoinRequest, Participant, Segment, Story, TurnPointer,
};
use crate::domain::events::STORY_CREATED_EVENT_TYPE;
use crate::domain::values::{StorySettings, Visibility};

/// Read-only view of a story.
#[derive(Debug, Serialize)]
pub struct StoryView {
    /// The story identifier.
    pub story_id: Uuid,
    /// The author.
    pub author_id: Uuid,
    /// Current settings.
    pub settings: StorySettings,
    /// Participants in join order.
    pub participants: Vec<Participant>,
    /// Whose turn it is; `None` once complete.
    pub current_turn: Option<TurnPointer>,
    /// Whether the segment cap was reached.
    pub completed: bool,
    /// Segments written so far.
    pub segment_count: u32,
    /// All invitations for the author; only the viewer's own otherwise.
    pub invitations: Vec<Invitation>,
    /// All join requests for the author; only the viewer's own otherwise.
    pub join_requests: Vec<JoinRequest>,
    /// When the story was created.
    pub created_at: Option<DateTime<Utc>>,
    /// Current version (event count).
    pub version: i64,
}

/// Short listing entry for a story.
#[derive(Debug, Serialize)]
pub struct StorySummary {
    /// The story identifier.
    pub story_id: Uuid,
    /// Title.
    pub title: String,
    /// Genre, if any.
    pub genre: Option<String>,
    /// The author.
    pub author_id: Uuid,
    /// Visibility.
    pub visibility: Visibility,
    /// Number of participants.
    pub participant_count: u32,
    /// Segments written so far.
    pub segment_count: u32,
    /// Segment cap.
    pub max_segments: u32,
    /// Whether the story is complete.
    pub completed: bool,
    /// Whether the viewer participates.
    pub is_participant: bool,
    /// Whether it is the viewer's turn.
    pub is_my_turn: bool,
}

/// A pending invitation addressed to a user.
#[derive(Debug, Serialize)]
pub struct PendingInvitationView {
    /// The invitation identifier.
    pub invitation_id: Uuid,
    /// The story it invites into.
    pub story_id: Uuid,
    /// The story's title.
    pub story_title: String,
    /// Who invited.
    pub inviter_id: Uuid,
    /// When it was sent.
    pub created_at: DateTime<Utc>,
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn ensure_visible(story: &Story, viewer_id: Uuid) -> Result<(), DomainError> {
    if story.is_visible_to(viewer_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "story {} is private",
            story.id
        )))
    }
}

fn to_view(story: &Story, viewer_id: Uuid) -> Result<StoryView, DomainError> {
    let (Some(author_id), Some(settings)) = (story.author_id, story.settings.clone()) else {
        return Err(DomainError::AggregateNotFound(story.id));
    };
    let is_author = author_id == viewer_id;
    Ok(StoryView {
        story_id: story.id,
        author_id,
        settings,
        participants: story.participants.clone(),
        current_turn: story.turn(),
        completed: story.completed,
        segment_count: count(story.segments.len()),
        invitations: story
            .invitations
            .iter()
            .filter(|i| is_author || i.invitee_id == viewer_id)
            .cloned()
            .collect(),
        join_requests: story
            .join_requests
            .iter()
            .filter(|r| is_author || r.requester_id == viewer_id)
            .cloned()
            .collect(),
        created_at: story.created_at,
        version: story.version,
    })
}

fn to_summary(story: &Story, viewer_id: Uuid) -> Option<StorySummary> {
    let author_id = story.author_id?;
    let settings = story.settings.as_ref()?;
    Some(StorySummary {
        story_id: story.id,
        title: settings.title.clone(),
        genre: settings.genre.clone(),
        author_id,
        visibility: settings.visibility,
        participant_count: count(story.participants.len()),
        segment_count: count(story.segments.len()),
        max_segments: settings.max_segments,
        completed: story.completed,
        is_participant: story.is_participant(viewer_id),
        is_my_turn: story.turn().is_some_and(|t| t.user_id == viewer_id),
    })
}

async fn all_stories(repo: &dyn EventRepository) -> Result<Vec<Story>, DomainError> {
    let mut stories = Vec::new();
    for story_id in repo.list_aggregate_ids(STORY_CREATED_EVENT_TYPE).await? {
        let events = repo.load_events(story_id).await?;
        let story = reconstitute(story_id, &events)?;
        if story.exists() {
            stories.push(story);
        }
    }
    Ok(stories)
}

/// Retrieves a story as seen by `viewer_id`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for unknown or deleted stories,
/// `DomainError::Forbidden` for private stories the viewer cannot see, or
/// `DomainError::Infrastructure` if loading fails.
pub async fn get_story_by_id(
    story_id: Uuid,
    viewer_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<StoryView, DomainError> {
    let story = load_existing(story_id, repo).await?;
    ensure_visible(&story, viewer_id)?;
    to_view(&story, viewer_id)
}

/// Lists a story's segments in turn order.
///
/// # Errors
///
/// Same as [`get_story_by_id`].
pub async fn list_segments(
    story_id: Uuid,
    viewer_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<Segment>, DomainError> {
    let story = load_existing(story_id, repo).await?;
    ensure_visible(&story, viewer_id)?;
    Ok(story.segments)
}

/// Lists the stories `viewer_id` can see, oldest first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if loading fails.
pub async fn list_stories(
    viewer_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<StorySummary>, DomainError> {
    Ok(all_stories(repo)
        .await?
        .iter()
        .filter(|story| story.is_visible_to(viewer_id))
        .filter_map(|story| to_summary(story, viewer_id))
        .collect())
}

/// Lists the invitations awaiting an answer from `user_id`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if loading fails.
pub async fn list_pending_invitations(
    user_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<Vec<PendingInvitationView>, DomainError> {
    let mut pending = Vec::new();
    for story in all_stories(repo).await? {
        if story.completed {
            continue;
        }
        let title = story
            .settings
            .as_ref()
            .map(|s| s.title.clone())
            .unwrap_or_default();
        for invitation in story
            .invitations
            .iter()
            .filter(|i| i.invitee_id == user_id && i.status == InvitationStatus::Pending)
        {
            pending.push(PendingInvitationView {
                invitation_id: invitation.invitation_id,
                story_id: story.id,
                story_title: title.clone(),
                inviter_id: invitation.inviter_id,
                created_at: invitation.created_at,
            });
        }
    }
    Ok(pending)
}
