//! Notification model and the publishing seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened, from the recipient's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient was invited to a story.
    Invitation {
        /// The invitation to accept or decline.
        invitation_id: Uuid,
        /// Who sent it.
        inviter_id: Uuid,
    },
    /// An invitation sent by the recipient was accepted.
    InvitationAccepted {
        /// The accepted invitation.
        invitation_id: Uuid,
        /// The user who joined.
        invitee_id: Uuid,
    },
    /// An invitation sent by the recipient was declined.
    InvitationDeclined {
        /// The declined invitation.
        invitation_id: Uuid,
        /// The user who declined.
        invitee_id: Uuid,
    },
    /// It is now the recipient's turn to write.
    Turn {
        /// The turn number the recipient's segment will receive.
        turn_index: u32,
    },
    /// Someone asked to join a story the recipient authors.
    JoinRequest {
        /// The pending request.
        request_id: Uuid,
        /// Who asked.
        requester_id: Uuid,
    },
    /// The recipient's join request was approved.
    JoinRequestApproved {
        /// The approved request.
        request_id: Uuid,
    },
    /// The recipient's join request was denied.
    JoinRequestDenied {
        /// The denied request.
        request_id: Uuid,
    },
    /// A story the recipient takes part in reached its segment cap.
    StoryCompleted {
        /// Final segment count.
        total_segments: u32,
    },
    /// A story the recipient takes part in was deleted by its author.
    StoryDeleted,
}

impl NotificationKind {
    /// The wire name of this notification type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Invitation { .. } => "invitation",
            Self::InvitationAccepted { .. } => "invitation_accepted",
            Self::InvitationDeclined { .. } => "invitation_declined",
            Self::Turn { .. } => "turn",
            Self::JoinRequest { .. } => "join_request",
            Self::JoinRequestApproved { .. } => "join_request_approved",
            Self::JoinRequestDenied { .. } => "join_request_denied",
            Self::StoryCompleted { .. } => "story_completed",
            Self::StoryDeleted => "story_deleted",
        }
    }
}

/// A notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The user who should receive this notification.
    pub recipient_id: Uuid,
    /// The story the notification concerns.
    pub story_id: Uuid,
    /// When the underlying change was committed.
    pub occurred_at: DateTime<Utc>,
    /// Typed payload.
    #[serde(flatten)]
    pub kind: NotificationKind,
}

/// Publishing side of the relay.
///
/// Implementations must not block and must not fail the caller; the state
/// change has already been committed when `notify` is called.
pub trait Notifier: Send + Sync {
    /// Publishes a notification.
    fn notify(&self, notification: Notification);
}
