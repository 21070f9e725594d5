//! Maps committed story events to the users who should hear about them.

use taleweave_notifications::{Notification, NotificationKind};
use uuid::Uuid;

use crate::domain::aggregates::Story;
use crate::domain::events::{StoryEvent, StoryEventKind};

/// Builds the notifications for `events`, which were just persisted for
/// `story` on behalf of `actor_id`. `story` already reflects the events.
pub(crate) fn notifications_for(
    story: &Story,
    events: &[StoryEvent],
    actor_id: Uuid,
) -> Vec<Notification> {
    let mut notifications = Vec::new();
    for event in events {
        let occurred_at = event.metadata.occurred_at;
        let mut push = |recipient_id: Uuid, kind: NotificationKind| {
            notifications.push(Notification {
                recipient_id,
                story_id: story.id,
                occurred_at,
                kind,
            });
        };

        match &event.kind {
            StoryEventKind::InvitationSent(payload) => push(
                payload.invitee_id,
                NotificationKind::Invitation {
                    invitation_id: payload.invitation_id,
                    inviter_id: payload.inviter_id,
                },
            ),
            StoryEventKind::InvitationAccepted(payload) => {
                if let Some(inviter_id) = inviter_of(story, payload.invitation_id) {
                    push(
                        inviter_id,
                        NotificationKind::InvitationAccepted {
                            invitation_id: payload.invitation_id,
                            invitee_id: payload.invitee_id,
                        },
                    );
                }
            }
            StoryEventKind::InvitationDeclined(payload) => {
                if let Some(inviter_id) = inviter_of(story, payload.invitation_id) {
                    push(
                        inviter_id,
                        NotificationKind::InvitationDeclined {
                            invitation_id: payload.invitation_id,
                            invitee_id: payload.invitee_id,
                        },
                    );
                }
            }
            StoryEventKind::TurnAdvanced(payload) if payload.user_id != actor_id => push(
                payload.user_id,
                NotificationKind::Turn {
                    turn_index: payload.turn_index,
                },
            ),
            StoryEventKind::JoinRequested(payload) => {
                if let Some(author_id) = story.author_id {
                    push(
                        author_id,
                        NotificationKind::JoinRequest {
                            request_id: payload.request_id,
                            requester_id: payload.requester_id,
                        },
                    );
                }
            }
            StoryEventKind::JoinRequestApproved(payload) => push(
                payload.requester_id,
                NotificationKind::JoinRequestApproved {
                    request_id: payload.request_id,
                },
            ),
            StoryEventKind::JoinRequestDenied(payload) => push(
                payload.requester_id,
                NotificationKind::JoinRequestDenied {
                    request_id: payload.request_id,
                },
            ),
            StoryEventKind::StoryCompleted(payload) => {
                for participant in &story.participants {
                    push(
                        participant.user_id,
                        NotificationKind::StoryCompleted {
                            total_segments: payload.total_segments,
                        },
                    );
                }
            }
            StoryEventKind::StoryDeleted(_) => {
                for participant in story.participants.iter().filter(|p| p.user_id != actor_id) {
                    push(participant.user_id, NotificationKind::StoryDeleted);
                }
            }
            _ => {}
        }
    }
    notifications
}

fn inviter_of(story: &Story, invitation_id: Uuid) -> Option<Uuid> {
    story
        .invitations
        .iter()
        .find(|i| i.invitation_id == invitation_id)
        .map(|i| i.inviter_id)
}
