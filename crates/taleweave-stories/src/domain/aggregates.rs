//! Aggregate roots for the Story Collaboration context.
//!
//! A `Story` owns everything whose consistency matters within one story:
//! participants in join order, the ordered segments, the single turn
//! pointer, invitations and join requests. Every command is decided against
//! one reconstituted stream, so the event store's per-stream version check is
//! all the serialization a story needs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use taleweave_core::aggregate::AggregateRoot;
use taleweave_core::clock::Clock;
use taleweave_core::error::DomainError;
use taleweave_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    InvitationAccepted, InvitationDeclined, InvitationSent, JoinRequestApproved,
    JoinRequestDenied, JoinRequested, ParticipantJoined, SegmentSubmitted, StoryCompleted,
    StoryCreated, StoryDeleted, StoryEvent, StoryEventKind, StorySettingsUpdated, TurnAdvanced,
};
use super::values::{Role, StorySettings, TextMeasure, Visibility};

/// A user taking part in a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// The participant.
    pub user_id: Uuid,
    /// Author or participant.
    pub role: Role,
    /// When they joined.
    pub joined_at: DateTime<Utc>,
}

/// One turn's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Segment identifier.
    pub segment_id: Uuid,
    /// 1-based turn number.
    pub turn: u32,
    /// Writer.
    pub author_id: Uuid,
    /// Text.
    pub content: String,
    /// Whitespace-separated tokens.
    pub word_count: u32,
    /// Unicode scalar values.
    pub character_count: u32,
    /// When it was written.
    pub created_at: DateTime<Utc>,
}

/// Whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnPointer {
    /// The turn number the next segment will receive.
    pub turn_index: u32,
    /// The participant expected to write it.
    pub user_id: Uuid,
}

/// Lifecycle of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting the invitee.
    Pending,
    /// The invitee joined.
    Accepted,
    /// The invitee declined.
    Declined,
}

/// An invitation from the author to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invitation {
    /// Invitation identifier.
    pub invitation_id: Uuid,
    /// Who invited.
    pub inviter_id: Uuid,
    /// Who was invited.
    pub invitee_id: Uuid,
    /// Current status.
    pub status: InvitationStatus,
    /// When it was sent.
    pub created_at: DateTime<Utc>,
    /// When it was accepted or declined.
    pub decided_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    /// Awaiting the author.
    Pending,
    /// The requester joined.
    Approved,
    /// The author said no.
    Denied,
}

/// A user's request to join a public story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinRequest {
    /// Request identifier.
    pub request_id: Uuid,
    /// Who asked.
    pub requester_id: Uuid,
    /// Current status.
    pub status: JoinRequestStatus,
    /// When it was made.
    pub created_at: DateTime<Utc>,
    /// When it was approved or denied.
    pub decided_at: Option<DateTime<Utc>>,
}

/// The aggregate root for a collaborative story.
#[derive(Debug)]
pub struct Story {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) author_id: Option<Uuid>,
    pub(crate) settings: Option<StorySettings>,
    /// Participants in join order.
    pub(crate) participants: Vec<Participant>,
    /// Segments in turn order.
    pub(crate) segments: Vec<Segment>,
    /// `None` before creation, once complete, and once deleted.
    pub(crate) turn: Option<TurnPointer>,
    pub(crate) completed: bool,
    pub(crate) deleted: bool,
    pub(crate) invitations: Vec<Invitation>,
    pub(crate) join_requests: Vec<JoinRequest>,
    pub(crate) created_at: Option<DateTime<Utc>>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<StoryEvent>,
}

impl Story {
    /// Creates an empty story with no history.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            author_id: None,
            settings: None,
            participants: Vec::new(),
            segments: Vec::new(),
            turn: None,
            completed: false,
            deleted: false,
            invitations: Vec::new(),
            join_requests: Vec::new(),
            created_at: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Whether the story has been created and not deleted.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.settings.is_some() && !self.deleted
    }

    /// Whether `user_id` is a participant (author included).
    #[must_use]
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Whether `user_id` holds a pending invitation.
    #[must_use]
    pub fn has_pending_invitation(&self, user_id: Uuid) -> bool {
        self.invitations
            .iter()
            .any(|i| i.invitee_id == user_id && i.status == InvitationStatus::Pending)
    }

    /// Whether `user_id` may read this story.
    #[must_use]
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.settings
            .as_ref()
            .is_some_and(|s| s.visibility == Visibility::Public)
            || self.is_participant(user_id)
            || self.has_pending_invitation(user_id)
    }

    /// The participant who writes after `user_id`, wrapping around in join order.
    #[must_use]
    pub fn next_writer_after(&self, user_id: Uuid) -> Option<Uuid> {
        let position = self.participants.iter().position(|p| p.user_id == user_id)?;
        let next = (position + 1) % self.participants.len();
        Some(self.participants[next].user_id)
    }

    /// The current turn pointer, if the story is still being written.
    #[must_use]
    pub fn turn(&self) -> Option<TurnPointer> {
        self.turn
    }

    fn record(&mut self, kind: StoryEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = StoryEvent {
            metadata: EventMetadata::caused_by_command(
                kind.event_type(),
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock,
            ),
            kind,
        };
        self.mutate(&event.kind, event.metadata.occurred_at);
        self.uncommitted_events.push(event);
    }

    #[allow(clippy::too_many_lines)]
    fn mutate(&mut self, kind: &StoryEventKind, occurred_at: DateTime<Utc>) {
        match kind {
            StoryEventKind::StoryCreated(payload) => {
                self.author_id = Some(payload.author_id);
                self.settings = Some(payload.settings.clone());
                self.created_at = Some(occurred_at);
            }
            StoryEventKind::StorySettingsUpdated(payload) => {
                self.settings = Some(payload.settings.clone());
            }
            StoryEventKind::ParticipantJoined(payload) => {
                self.participants.push(Participant {
                    user_id: payload.user_id,
                    role: payload.role,
                    joined_at: occurred_at,
                });
            }
            StoryEventKind::SegmentSubmitted(payload) => {
                self.segments.push(Segment {
                    segment_id: payload.segment_id,
                    turn: payload.turn,
                    author_id: payload.author_id,
                    content: payload.content.clone(),
                    word_count: payload.word_count,
                    character_count: payload.character_count,
                    created_at: occurred_at,
                });
            }
            StoryEventKind::TurnAdvanced(payload) => {
                self.turn = Some(TurnPointer {
                    turn_index: payload.turn_index,
                    user_id: payload.user_id,
                });
            }
            StoryEventKind::StoryCompleted(_) => {
                self.completed = true;
                self.turn = None;
            }
            StoryEventKind::InvitationSent(payload) => {
                self.invitations.push(Invitation {
                    invitation_id: payload.invitation_id,
                    inviter_id: payload.inviter_id,
                    invitee_id: payload.invitee_id,
                    status: InvitationStatus::Pending,
                    created_at: occurred_at,
                    decided_at: None,
                });
            }
            StoryEventKind::InvitationAccepted(payload) => {
                self.decide_invitation(
                    payload.invitation_id,
                    InvitationStatus::Accepted,
                    occurred_at,
                );
            }
            StoryEventKind::InvitationDeclined(payload) => {
                self.decide_invitation(
                    payload.invitation_id,
                    InvitationStatus::Declined,
                    occurred_at,
                );
            }
            StoryEventKind::JoinRequested(payload) => {
                self.join_requests.push(JoinRequest {
                    request_id: payload.request_id,
                    requester_id: payload.requester_id,
                    status: JoinRequestStatus::Pending,
                    created_at: occurred_at,
                    decided_at: None,
                });
            }
            StoryEventKind::JoinRequestApproved(payload) => {
                self.decide_join_request(
                    payload.request_id,
                    JoinRequestStatus::Approved,
                    occurred_at,
                );
            }
            StoryEventKind::JoinRequestDenied(payload) => {
                self.decide_join_request(
                    payload.request_id,
                    JoinRequestStatus::Denied,
                    occurred_at,
                );
            }
            StoryEventKind::StoryDeleted(_) => {
                self.deleted = true;
                self.turn = None;
            }
        }
    }

    fn decide_invitation(
        &mut self,
        invitation_id: Uuid,
        status: InvitationStatus,
        at: DateTime<Utc>,
    ) {
        if let Some(invitation) = self
            .invitations
            .iter_mut()
            .find(|i| i.invitation_id == invitation_id)
        {
            invitation.status = status;
            invitation.decided_at = Some(at);
        }
    }

    fn decide_join_request(
        &mut self,
        request_id: Uuid,
        status: JoinRequestStatus,
        at: DateTime<Utc>,
    ) {
        if let Some(request) = self
            .join_requests
            .iter_mut()
            .find(|r| r.request_id == request_id)
        {
            request.status = status;
            request.decided_at = Some(at);
        }
    }

    fn settings(&self) -> Result<&StorySettings, DomainError> {
        self.settings
            .as_ref()
            .ok_or(DomainError::AggregateNotFound(self.id))
    }

    fn ensure_author(&self, actor_id: Uuid, action: &str) -> Result<(), DomainError> {
        if self.author_id == Some(actor_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "only the story's author may {action}"
            )))
        }
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.completed {
            return Err(DomainError::Conflict(format!(
                "story {} is complete",
                self.id
            )));
        }
        Ok(())
    }

    fn pending_invitation(
        &self,
        invitation_id: Uuid,
        actor_id: Uuid,
    ) -> Result<&Invitation, DomainError> {
        let invitation = self
            .invitations
            .iter()
            .find(|i| i.invitation_id == invitation_id)
            .ok_or_else(|| DomainError::NotFound(format!("invitation {invitation_id}")))?;
        if invitation.invitee_id != actor_id {
            return Err(DomainError::Forbidden(
                "only the invited user may answer an invitation".into(),
            ));
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "invitation {invitation_id} was already answered"
            )));
        }
        Ok(invitation)
    }

    fn pending_join_request(&self, request_id: Uuid) -> Result<&JoinRequest, DomainError> {
        let request = self
            .join_requests
            .iter()
            .find(|r| r.request_id == request_id)
            .ok_or_else(|| DomainError::NotFound(format!("join request {request_id}")))?;
        if request.status != JoinRequestStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "join request {request_id} was already decided"
            )));
        }
        Ok(request)
    }

    /// Starts the story. The author becomes the first participant and holds
    /// turn 1.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` if the story already has history and
    /// `DomainError::Validation` for invalid settings.
    pub fn create(
        &mut self,
        author_id: Uuid,
        settings: StorySettings,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.settings.is_some() {
            return Err(DomainError::Conflict(format!(
                "story {} already exists",
                self.id
            )));
        }
        let settings = settings.normalized()?;
        let story_id = self.id;

        self.record(
            StoryEventKind::StoryCreated(StoryCreated {
                story_id,
                author_id,
                settings,
            }),
            correlation_id,
            clock,
        );
        self.record(
            StoryEventKind::ParticipantJoined(ParticipantJoined {
                story_id,
                user_id: author_id,
                role: Role::Author,
            }),
            correlation_id,
            clock,
        );
        self.record(
            StoryEventKind::TurnAdvanced(TurnAdvanced {
                story_id,
                turn_index: 1,
                user_id: author_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Replaces the story's settings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for anyone but the author,
    /// `DomainError::Conflict` once the story is complete, and
    /// `DomainError::Validation` if the settings are invalid or leave no turn
    /// to write.
    pub fn update_settings(
        &mut self,
        actor_id: Uuid,
        settings: StorySettings,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_author(actor_id, "change its settings")?;
        self.ensure_open()?;
        let settings = settings.normalized()?;
        let written = self.segments.len();
        if settings.max_segments as usize <= written {
            return Err(DomainError::Validation(format!(
                "max_segments must exceed the {written} segments already written"
            )));
        }

        self.record(
            StoryEventKind::StorySettingsUpdated(StorySettingsUpdated {
                story_id: self.id,
                settings,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Appends the current turn's segment and moves the turn on, or completes
    /// the story if this segment reaches the cap.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` once the story is complete,
    /// `DomainError::Forbidden` if `actor_id` does not hold the turn, and
    /// `DomainError::Validation` for empty content or content over the
    /// per-turn word/character limits. No state changes on error.
    pub fn submit_segment(
        &mut self,
        actor_id: Uuid,
        segment_id: Uuid,
        content: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_open()?;
        let pointer = self.turn.ok_or_else(|| {
            DomainError::Conflict(format!("story {} has no active turn", self.id))
        })?;
        if pointer.user_id != actor_id {
            return Err(DomainError::Forbidden(format!(
                "it is not your turn; turn {} belongs to user {}",
                pointer.turn_index, pointer.user_id
            )));
        }
        let settings = self.settings()?;
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation(
                "segment content must not be empty".into(),
            ));
        }
        let measure = TextMeasure::of(content);
        if measure.word_count > settings.max_words_per_turn {
            return Err(DomainError::Validation(format!(
                "segment has {} words; the limit is {}",
                measure.word_count, settings.max_words_per_turn
            )));
        }
        if measure.character_count > settings.max_characters_per_turn {
            return Err(DomainError::Validation(format!(
                "segment has {} characters; the limit is {}",
                measure.character_count, settings.max_characters_per_turn
            )));
        }
        let max_segments = settings.max_segments;
        let story_id = self.id;

        self.record(
            StoryEventKind::SegmentSubmitted(SegmentSubmitted {
                story_id,
                segment_id,
                turn: pointer.turn_index,
                author_id: actor_id,
                content: content.to_owned(),
                word_count: measure.word_count,
                character_count: measure.character_count,
            }),
            correlation_id,
            clock,
        );

        let total_segments = u32::try_from(self.segments.len()).unwrap_or(u32::MAX);
        if total_segments >= max_segments {
            self.record(
                StoryEventKind::StoryCompleted(StoryCompleted {
                    story_id,
                    total_segments,
                }),
                correlation_id,
                clock,
            );
        } else {
            let next_writer = self.next_writer_after(actor_id).unwrap_or(actor_id);
            self.record(
                StoryEventKind::TurnAdvanced(TurnAdvanced {
                    story_id,
                    turn_index: pointer.turn_index + 1,
                    user_id: next_writer,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Invites `invitee_id`. Whether the invitee is a registered user is
    /// checked by the caller.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for anyone but the author,
    /// `DomainError::Conflict` once complete or when the invitee already
    /// participates or holds a pending invitation, and
    /// `DomainError::Validation` for a self-invitation.
    pub fn invite(
        &mut self,
        actor_id: Uuid,
        invitation_id: Uuid,
        invitee_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_author(actor_id, "send invitations")?;
        self.ensure_open()?;
        if invitee_id == actor_id {
            return Err(DomainError::Validation("you cannot invite yourself".into()));
        }
        if self.is_participant(invitee_id) {
            return Err(DomainError::Conflict(format!(
                "user {invitee_id} already participates in this story"
            )));
        }
        if self.has_pending_invitation(invitee_id) {
            return Err(DomainError::Conflict(format!(
                "user {invitee_id} already has a pending invitation"
            )));
        }
        if self
            .invitations
            .iter()
            .any(|i| i.invitation_id == invitation_id)
        {
            return Err(DomainError::Conflict(format!(
                "invitation {invitation_id} already exists"
            )));
        }

        self.record(
            StoryEventKind::InvitationSent(InvitationSent {
                story_id: self.id,
                invitation_id,
                inviter_id: actor_id,
                invitee_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Accepts a pending invitation; the invitee joins at the end of the
    /// rotation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown invitation,
    /// `DomainError::Forbidden` if `actor_id` is not the invitee, and
    /// `DomainError::Conflict` if it was already answered or the story is
    /// complete.
    pub fn accept_invitation(
        &mut self,
        actor_id: Uuid,
        invitation_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.pending_invitation(invitation_id, actor_id)?;
        self.ensure_open()?;
        let story_id = self.id;

        self.record(
            StoryEventKind::InvitationAccepted(InvitationAccepted {
                story_id,
                invitation_id,
                invitee_id: actor_id,
            }),
            correlation_id,
            clock,
        );
        if !self.is_participant(actor_id) {
            self.record(
                StoryEventKind::ParticipantJoined(ParticipantJoined {
                    story_id,
                    user_id: actor_id,
                    role: Role::Participant,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Declines a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown invitation,
    /// `DomainError::Forbidden` if `actor_id` is not the invitee, and
    /// `DomainError::Conflict` if it was already answered.
    pub fn decline_invitation(
        &mut self,
        actor_id: Uuid,
        invitation_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.pending_invitation(invitation_id, actor_id)?;

        self.record(
            StoryEventKind::InvitationDeclined(InvitationDeclined {
                story_id: self.id,
                invitation_id,
                invitee_id: actor_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Records a request from `actor_id` to join.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for private stories and
    /// `DomainError::Conflict` once complete, for existing participants, and
    /// when the user already has a pending request.
    pub fn request_to_join(
        &mut self,
        actor_id: Uuid,
        request_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.settings()?.visibility == Visibility::Private {
            return Err(DomainError::Forbidden(
                "private stories can only be joined by invitation".into(),
            ));
        }
        self.ensure_open()?;
        if self.is_participant(actor_id) {
            return Err(DomainError::Conflict(
                "you already participate in this story".into(),
            ));
        }
        if self
            .join_requests
            .iter()
            .any(|r| r.requester_id == actor_id && r.status == JoinRequestStatus::Pending)
        {
            return Err(DomainError::Conflict(
                "you already have a pending join request for this story".into(),
            ));
        }
        if self.join_requests.iter().any(|r| r.request_id == request_id) {
            return Err(DomainError::Conflict(format!(
                "join request {request_id} already exists"
            )));
        }

        self.record(
            StoryEventKind::JoinRequested(JoinRequested {
                story_id: self.id,
                request_id,
                requester_id: actor_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Approves a pending join request; the requester joins at the end of the
    /// rotation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for anyone but the author,
    /// `DomainError::NotFound` for an unknown request, and
    /// `DomainError::Conflict` if it was already decided or the story is
    /// complete.
    pub fn approve_join_request(
        &mut self,
        actor_id: Uuid,
        request_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_author(actor_id, "approve join requests")?;
        let requester_id = self.pending_join_request(request_id)?.requester_id;
        self.ensure_open()?;
        let story_id = self.id;

        self.record(
            StoryEventKind::JoinRequestApproved(JoinRequestApproved {
                story_id,
                request_id,
                requester_id,
                approved_by: actor_id,
            }),
            correlation_id,
            clock,
        );
        if !self.is_participant(requester_id) {
            self.record(
                StoryEventKind::ParticipantJoined(ParticipantJoined {
                    story_id,
                    user_id: requester_id,
                    role: Role::Participant,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Denies a pending join request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for anyone but the author,
    /// `DomainError::NotFound` for an unknown request, and
    /// `DomainError::Conflict` if it was already decided.
    pub fn deny_join_request(
        &mut self,
        actor_id: Uuid,
        request_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_author(actor_id, "deny join requests")?;
        let requester_id = self.pending_join_request(request_id)?.requester_id;

        self.record(
            StoryEventKind::JoinRequestDenied(JoinRequestDenied {
                story_id: self.id,
                request_id,
                requester_id,
                denied_by: actor_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Deletes the story.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for anyone but the author.
    pub fn delete(
        &mut self,
        actor_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_author(actor_id, "delete it")?;

        self.record(
            StoryEventKind::StoryDeleted(StoryDeleted {
                story_id: self.id,
                deleted_by: actor_id,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }
}

impl AggregateRoot for Story {
    type Event = StoryEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(&event.kind, event.metadata.occurred_at);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
