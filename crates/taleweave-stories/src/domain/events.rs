//! Domain events for the Story Collaboration context.

use serde::{Deserialize, Serialize};
use taleweave_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

use super::values::{Role, StorySettings};

/// Prefix shared by every story event type.
pub const STORIES_CONTEXT: &str = "stories";

/// Event type for `StoryCreated`.
pub const STORY_CREATED_EVENT_TYPE: &str = "stories.story_created";
/// Event type for `StorySettingsUpdated`.
pub const STORY_SETTINGS_UPDATED_EVENT_TYPE: &str = "stories.settings_updated";
/// Event type for `ParticipantJoined`.
pub const PARTICIPANT_JOINED_EVENT_TYPE: &str = "stories.participant_joined";
/// Event type for `SegmentSubmitted`.
pub const SEGMENT_SUBMITTED_EVENT_TYPE: &str = "stories.segment_submitted";
/// Event type for `TurnAdvanced`.
pub const TURN_ADVANCED_EVENT_TYPE: &str = "stories.turn_advanced";
/// Event type for `StoryCompleted`.
pub const STORY_COMPLETED_EVENT_TYPE: &str = "stories.story_completed";
/// Event type for `InvitationSent`.
pub const INVITATION_SENT_EVENT_TYPE: &str = "stories.invitation_sent";
/// Event type for `InvitationAccepted`.
pub const INVITATION_ACCEPTED_EVENT_TYPE: &str = "stories.invitation_accepted";
/// Event type for `InvitationDeclined`.
pub const INVITATION_DECLINED_EVENT_TYPE: &str = "stories.invitation_declined";
/// Event type for `JoinRequested`.
pub const JOIN_REQUESTED_EVENT_TYPE: &str = "stories.join_requested";
/// Event type for `JoinRequestApproved`.
pub const JOIN_REQUEST_APPROVED_EVENT_TYPE: &str = "stories.join_request_approved";
/// Event type for `JoinRequestDenied`.
pub const JOIN_REQUEST_DENIED_EVENT_TYPE: &str = "stories.join_request_denied";
/// Event type for `StoryDeleted`.
pub const STORY_DELETED_EVENT_TYPE: &str = "stories.story_deleted";

/// Emitted when an author starts a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCreated {
    /// The story identifier.
    pub story_id: Uuid,
    /// The author.
    pub author_id: Uuid,
    /// Initial settings.
    pub settings: StorySettings,
}

/// Emitted when the author changes the story's settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySettingsUpdated {
    /// The story identifier.
    pub story_id: Uuid,
    /// The complete new settings.
    pub settings: StorySettings,
}

/// Emitted when a user becomes a participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantJoined {
    /// The story identifier.
    pub story_id: Uuid,
    /// The user who joined.
    pub user_id: Uuid,
    /// Their role.
    pub role: Role,
}

/// Emitted when the current turn holder contributes a segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSubmitted {
    /// The story identifier.
    pub story_id: Uuid,
    /// The segment identifier.
    pub segment_id: Uuid,
    /// 1-based turn number of this segment.
    pub turn: u32,
    /// The writer.
    pub author_id: Uuid,
    /// The segment text, trimmed.
    pub content: String,
    /// Whitespace-separated tokens in `content`.
    pub word_count: u32,
    /// Unicode scalar values in `content`.
    pub character_count: u32,
}

/// Emitted when the turn pointer moves to a participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnAdvanced {
    /// The story identifier.
    pub story_id: Uuid,
    /// The turn number the next segment will receive.
    pub turn_index: u32,
    /// The participant expected to write it.
    pub user_id: Uuid,
}

/// Emitted when the segment cap is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCompleted {
    /// The story identifier.
    pub story_id: Uuid,
    /// Final segment count.
    pub total_segments: u32,
}

/// Emitted when the author invites a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationSent {
    /// The story identifier.
    pub story_id: Uuid,
    /// The invitation identifier.
    pub invitation_id: Uuid,
    /// Who invited.
    pub inviter_id: Uuid,
    /// Who was invited.
    pub invitee_id: Uuid,
}

/// Emitted when an invitee accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationAccepted {
    /// The story identifier.
    pub story_id: Uuid,
    /// The invitation identifier.
    pub invitation_id: Uuid,
    /// The invitee.
    pub invitee_id: Uuid,
}

/// Emitted when an invitee declines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationDeclined {
    /// The story identifier.
    pub story_id: Uuid,
    /// The invitation identifier.
    pub invitation_id: Uuid,
    /// The invitee.
    pub invitee_id: Uuid,
}

/// Emitted when a user asks to join a public story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequested {
    /// The story identifier.
    pub story_id: Uuid,
    /// The request identifier.
    pub request_id: Uuid,
    /// Who asked.
    pub requester_id: Uuid,
}

/// Emitted when the author approves a join request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequestApproved {
    /// The story identifier.
    pub story_id: Uuid,
    /// The request identifier.
    pub request_id: Uuid,
    /// Who asked.
    pub requester_id: Uuid,
    /// The approving author.
    pub approved_by: Uuid,
}

/// Emitted when the author denies a join request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequestDenied {
    /// The story identifier.
    pub story_id: Uuid,
    /// The request identifier.
    pub request_id: Uuid,
    /// Who asked.
    pub requester_id: Uuid,
    /// The denying author.
    pub denied_by: Uuid,
}

/// Emitted when the author deletes the story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDeleted {
    /// The story identifier.
    pub story_id: Uuid,
    /// The author who deleted it.
    pub deleted_by: Uuid,
}

/// Event payload variants for the Story Collaboration context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoryEventKind {
    /// A story was created.
    StoryCreated(StoryCreated),
    /// Settings changed.
    StorySettingsUpdated(StorySettingsUpdated),
    /// A participant joined.
    ParticipantJoined(ParticipantJoined),
    /// A segment was written.
    SegmentSubmitted(SegmentSubmitted),
    /// The turn moved on.
    TurnAdvanced(TurnAdvanced),
    /// The segment cap was reached.
    StoryCompleted(StoryCompleted),
    /// An invitation was sent.
    InvitationSent(InvitationSent),
    /// An invitation was accepted.
    InvitationAccepted(InvitationAccepted),
    /// An invitation was declined.
    InvitationDeclined(InvitationDeclined),
    /// A join request was made.
    JoinRequested(JoinRequested),
    /// A join request was approved.
    JoinRequestApproved(JoinRequestApproved),
    /// A join request was denied.
    JoinRequestDenied(JoinRequestDenied),
    /// The story was deleted.
    StoryDeleted(StoryDeleted),
}

impl StoryEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StoryCreated(_) => STORY_CREATED_EVENT_TYPE,
            Self::StorySettingsUpdated(_) => STORY_SETTINGS_UPDATED_EVENT_TYPE,
            Self::ParticipantJoined(_) => PARTICIPANT_JOINED_EVENT_TYPE,
            Self::SegmentSubmitted(_) => SEGMENT_SUBMITTED_EVENT_TYPE,
            Self::TurnAdvanced(_) => TURN_ADVANCED_EVENT_TYPE,
            Self::StoryCompleted(_) => STORY_COMPLETED_EVENT_TYPE,
            Self::InvitationSent(_) => INVITATION_SENT_EVENT_TYPE,
            Self::InvitationAccepted(_) => INVITATION_ACCEPTED_EVENT_TYPE,
            Self::InvitationDeclined(_) => INVITATION_DECLINED_EVENT_TYPE,
            Self::JoinRequested(_) => JOIN_REQUESTED_EVENT_TYPE,
            Self::JoinRequestApproved(_) => JOIN_REQUEST_APPROVED_EVENT_TYPE,
            Self::JoinRequestDenied(_) => JOIN_REQUEST_DENIED_EVENT_TYPE,
            Self::StoryDeleted(_) => STORY_DELETED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Story Collaboration context.
#[derive(Debug, Clone)]
pub struct StoryEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: StoryEventKind,
}

impl DomainEvent for StoryEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("StoryEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
