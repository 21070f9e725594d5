//! Commands for the Story Collaboration context.

use taleweave_core::command::Command;
use uuid::Uuid;

use super::values::StorySettings;

macro_rules! story_command {
    ($command:ty, $type_name:literal, $actor:ident) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $type_name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn actor_id(&self) -> Uuid {
                self.$actor
            }
        }
    };
}

/// Command to start a new story.
#[derive(Debug, Clone)]
pub struct CreateStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier for the new story.
    pub story_id: Uuid,
    /// The author, who takes the first turn.
    pub author_id: Uuid,
    /// Initial settings.
    pub settings: StorySettings,
}

story_command!(CreateStory, "stories.create_story", author_id);

/// Command to replace a story's settings.
#[derive(Debug, Clone)]
pub struct UpdateStorySettings {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story to update.
    pub story_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
    /// The complete new settings.
    pub settings: StorySettings,
}

story_command!(UpdateStorySettings, "stories.update_settings", actor_id);

/// Command to contribute the current turn's segment.
#[derive(Debug, Clone)]
pub struct SubmitSegment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story being written.
    pub story_id: Uuid,
    /// Identifier for the new segment.
    pub segment_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
    /// The segment text.
    pub content: String,
}

story_command!(SubmitSegment, "stories.submit_segment", actor_id);

/// Command to invite a registered user into a story.
#[derive(Debug, Clone)]
pub struct InviteParticipant {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story to invite into.
    pub story_id: Uuid,
    /// Identifier for the new invitation.
    pub invitation_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
    /// The user being invited.
    pub invitee_id: Uuid,
}

story_command!(InviteParticipant, "stories.invite_participant", actor_id);

/// Command for an invitee to accept an invitation.
#[derive(Debug, Clone)]
pub struct AcceptInvitation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story the invitation belongs to.
    pub story_id: Uuid,
    /// The invitation.
    pub invitation_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
}

story_command!(AcceptInvitation, "stories.accept_invitation", actor_id);

/// Command for an invitee to decline an invitation.
#[derive(Debug, Clone)]
pub struct DeclineInvitation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story the invitation belongs to.
    pub story_id: Uuid,
    /// The invitation.
    pub invitation_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
}

story_command!(DeclineInvitation, "stories.decline_invitation", actor_id);

/// Command to ask to join a public story.
#[derive(Debug, Clone)]
pub struct RequestToJoin {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story to join.
    pub story_id: Uuid,
    /// Identifier for the new request.
    pub request_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
}

story_command!(RequestToJoin, "stories.request_to_join", actor_id);

/// Command for the author to approve a join request.
#[derive(Debug, Clone)]
pub struct ApproveJoinRequest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story the request belongs to.
    pub story_id: Uuid,
    /// The request.
    pub request_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
}

story_command!(ApproveJoinRequest, "stories.approve_join_request", actor_id);

/// Command for the author to deny a join request.
#[derive(Debug, Clone)]
pub struct DenyJoinRequest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story the request belongs to.
    pub story_id: Uuid,
    /// The request.
    pub request_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
}

story_command!(DenyJoinRequest, "stories.deny_join_request", actor_id);

/// Command for the author to delete a story.
#[derive(Debug, Clone)]
pub struct DeleteStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story to delete.
    pub story_id: Uuid,
    /// The user issuing the command.
    pub actor_id: Uuid,
}

story_command!(DeleteStory, "stories.delete_story", actor_id);
