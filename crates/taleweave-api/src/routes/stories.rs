//! Routes for the Story Collaboration bounded context.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use taleweave_stories::application::command_handlers::{self, StoryCommandResult};
use taleweave_stories::application::query_handlers::{self, StorySummary, StoryView};
use taleweave_stories::domain::aggregates::Segment;
use taleweave_stories::domain::commands;
use taleweave_stories::domain::values::{StorySettings, Visibility};

use crate::error::ApiError;
use crate::identity::ActingUser;
use crate::routes::CommandResponse;
use crate::state::AppState;

const DEFAULT_MAX_WORDS_PER_TURN: u32 = 150;
const DEFAULT_MAX_CHARACTERS_PER_TURN: u32 = 1000;
const DEFAULT_MAX_SEGMENTS: u32 = 20;

fn default_max_words_per_turn() -> u32 {
    DEFAULT_MAX_WORDS_PER_TURN
}

fn default_max_characters_per_turn() -> u32 {
    DEFAULT_MAX_CHARACTERS_PER_TURN
}

fn default_max_segments() -> u32 {
    DEFAULT_MAX_SEGMENTS
}

fn default_visibility() -> Visibility {
    Visibility::Public
}

/// Story settings as sent by clients; omitted limits take defaults.
#[derive(Debug, Deserialize)]
pub struct StorySettingsRequest {
    /// Story title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Optional genre label.
    #[serde(default)]
    pub genre: Option<String>,
    /// Maximum words per segment.
    #[serde(default = "default_max_words_per_turn")]
    pub max_words_per_turn: u32,
    /// Maximum characters per segment.
    #[serde(default = "default_max_characters_per_turn")]
    pub max_characters_per_turn: u32,
    /// Segment cap.
    #[serde(default = "default_max_segments")]
    pub max_segments: u32,
    /// `public` or `private`.
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,
}

impl From<StorySettingsRequest> for StorySettings {
    fn from(request: StorySettingsRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            genre: request.genre,
            max_words_per_turn: request.max_words_per_turn,
            max_characters_per_turn: request.max_characters_per_turn,
            max_segments: request.max_segments,
            visibility: request.visibility,
        }
    }
}

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    /// Client-chosen story ID; generated when omitted.
    #[serde(default)]
    pub story_id: Option<Uuid>,
    /// Initial settings.
    #[serde(flatten)]
    pub settings: StorySettingsRequest,
}

/// Request body for POST /{story_id}/segments.
#[derive(Debug, Deserialize)]
pub struct SubmitSegmentRequest {
    /// The segment text.
    pub content: String,
}

/// Request body for POST /{story_id}/invite.
#[derive(Debug, Deserialize)]
pub struct InviteParticipantRequest {
    /// The user to invite.
    pub invitee_id: Uuid,
}

fn respond(result: &StoryCommandResult) -> Json<CommandResponse> {
    Json(CommandResponse::new(result.aggregate_id, &result.stored_events))
}

/// POST /
#[instrument(skip(state, request))]
async fn create_story(
    State(state): State<AppState>,
    ActingUser(author_id): ActingUser,
    Json(request): Json<CreateStoryRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::CreateStory {
        correlation_id: Uuid::new_v4(),
        story_id: request.story_id.unwrap_or_else(Uuid::new_v4),
        author_id,
        settings: request.settings.into(),
    };

    info!(
        correlation_id = %command.correlation_id,
        story_id = %command.story_id,
        "handling create_story command"
    );

    let result = command_handlers::handle_create_story(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(respond(&result))
}

/// GET /
#[instrument(skip(state))]
async fn list_stories(
    State(state): State<AppState>,
    ActingUser(viewer_id): ActingUser,
) -> Result<Json<Vec<StorySummary>>, ApiError> {
    let stories = query_handlers::list_stories(viewer_id, &*state.event_repository).await?;
    Ok(Json(stories))
}

/// GET /{story_id}
#[instrument(skip(state))]
async fn get_story(
    State(state): State<AppState>,
    ActingUser(viewer_id): ActingUser,
    Path(story_id): Path<Uuid>,
) -> Result<Json<StoryView>, ApiError> {
    let view =
        query_handlers::get_story_by_id(story_id, viewer_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// DELETE /{story_id}
#[instrument(skip(state))]
async fn delete_story(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path(story_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DeleteStory {
        correlation_id: Uuid::new_v4(),
        story_id,
        actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_story command");

    let result = command_handlers::handle_delete_story(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(respond(&result))
}

/// POST /{story_id}/settings
#[instrument(skip(state, request))]
async fn update_settings(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path(story_id): Path<Uuid>,
    Json(request): Json<StorySettingsRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::UpdateStorySettings {
        correlation_id: Uuid::new_v4(),
        story_id,
        actor_id,
        settings: request.into(),
    };

    info!(correlation_id = %command.correlation_id, "handling update_settings command");

    let result = command_handlers::handle_update_story_settings(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(respond(&result))
}

/// POST /{story_id}/segments
#[instrument(skip(state, request))]
async fn submit_segment(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path(story_id): Path<Uuid>,
    Json(request): Json<SubmitSegmentRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SubmitSegment {
        correlation_id: Uuid::new_v4(),
        story_id,
        segment_id: Uuid::new_v4(),
        actor_id,
        content: request.content,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_segment command");

    let result = command_handlers::handle_submit_segment(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(Json(respond(&result).0.with_resource(command.segment_id)))
}

/// GET /{story_id}/segments
#[instrument(skip(state))]
async fn list_segments(
    State(state): State<AppState>,
    ActingUser(viewer_id): ActingUser,
    Path(story_id): Path<Uuid>,
) -> Result<Json<Vec<Segment>>, ApiError> {
    let segments =
        query_handlers::list_segments(story_id, viewer_id, &*state.event_repository).await?;
    Ok(Json(segments))
}

/// POST /{story_id}/invite
#[instrument(skip(state, request))]
async fn invite_participant(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path(story_id): Path<Uuid>,
    Json(request): Json<InviteParticipantRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::InviteParticipant {
        correlation_id: Uuid::new_v4(),
        story_id,
        invitation_id: Uuid::new_v4(),
        actor_id,
        invitee_id: request.invitee_id,
    };

    info!(
        correlation_id = %command.correlation_id,
        invitee_id = %command.invitee_id,
        "handling invite_participant command"
    );

    let result = command_handlers::handle_invite_participant(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(Json(respond(&result).0.with_resource(command.invitation_id)))
}

/// POST /{story_id}/invitations/{invitation_id}/accept
#[instrument(skip(state))]
async fn accept_invitation(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path((story_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::AcceptInvitation {
        correlation_id: Uuid::new_v4(),
        story_id,
        invitation_id,
        actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling accept_invitation command");

    let result = command_handlers::handle_accept_invitation(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(respond(&result))
}

/// POST /{story_id}/invitations/{invitation_id}/decline
#[instrument(skip(state))]
async fn decline_invitation(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path((story_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DeclineInvitation {
        correlation_id: Uuid::new_v4(),
        story_id,
        invitation_id,
        actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling decline_invitation command");

    let result = command_handlers::handle_decline_invitation(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(respond(&result))
}

/// POST /{story_id}/join-requests
#[instrument(skip(state))]
async fn request_to_join(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path(story_id): Path<Uuid>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RequestToJoin {
        correlation_id: Uuid::new_v4(),
        story_id,
        request_id: Uuid::new_v4(),
        actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling request_to_join command");

    let result = command_handlers::handle_request_to_join(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(Json(respond(&result).0.with_resource(command.request_id)))
}

/// POST /{story_id}/join-requests/{request_id}/approve
#[instrument(skip(state))]
async fn approve_join_request(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path((story_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ApproveJoinRequest {
        correlation_id: Uuid::new_v4(),
        story_id,
        request_id,
        actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling approve_join_request command");

    let result = command_handlers::handle_approve_join_request(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(respond(&result))
}

/// POST /{story_id}/join-requests/{request_id}/deny
#[instrument(skip(state))]
async fn deny_join_request(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path((story_id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::DenyJoinRequest {
        correlation_id: Uuid::new_v4(),
        story_id,
        request_id,
        actor_id,
    };

    info!(correlation_id = %command.correlation_id, "handling deny_join_request command");

    let result = command_handlers::handle_deny_join_request(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &state.notifications,
    )
    .await?;

    Ok(respond(&result))
}

/// Returns the router for the stories context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_story).get(list_stories))
        .route("/{story_id}", get(get_story).delete(delete_story))
        .route("/{story_id}/settings", post(update_settings))
        .route("/{story_id}/segments", post(submit_segment).get(list_segments))
        .route("/{story_id}/invite", post(invite_participant))
        .route(
            "/{story_id}/invitations/{invitation_id}/accept",
            post(accept_invitation),
        )
        .route(
            "/{story_id}/invitations/{invitation_id}/decline",
            post(decline_invitation),
        )
        .route("/{story_id}/join-requests", post(request_to_join))
        .route(
            "/{story_id}/join-requests/{request_id}/approve",
            post(approve_join_request),
        )
        .route(
            "/{story_id}/join-requests/{request_id}/deny",
            post(deny_join_request),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use sqlx::PgPool;
    use taleweave_core::repository::EventRepository;
    use taleweave_notifications::NotificationHub;
    use taleweave_test_support::{
        EmptyEventRepository, FailingEventRepository, FixedClock, InMemoryEventRepository,
        fixed_now,
    };
    use tower::ServiceExt;

    use crate::identity::USER_ID_HEADER;

    fn app_state_with(event_repository: Arc<dyn EventRepository>) -> AppState {
        let pool = PgPool::connect_lazy("postgres://localhost/test").unwrap();
        AppState::new(
            pool,
            Arc::new(FixedClock(fixed_now())),
            event_repository,
            NotificationHub::default(),
        )
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        user: Uuid,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, user.to_string());
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };
        let response = router()
            .with_state(state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create(state: &AppState, author: Uuid, body: Value) -> Uuid {
        let (status, json) = send(state, "POST", "/", author, Some(body)).await;
        assert_eq!(status, StatusCode::OK, "create failed: {json}");
        Uuid::parse_str(json["aggregate_id"].as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_create_story_applies_default_limits() {
        // Arrange
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let author = Uuid::new_v4();

        // Act
        let story_id = create(&state, author, json!({ "title": "Tidewater" })).await;
        let (status, view) = send(&state, "GET", &format!("/{story_id}"), author, None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["settings"]["title"], "Tidewater");
        assert_eq!(view["settings"]["max_words_per_turn"], 150);
        assert_eq!(view["settings"]["max_characters_per_turn"], 1000);
        assert_eq!(view["settings"]["max_segments"], 20);
        assert_eq!(view["settings"]["visibility"], "public");
        assert_eq!(view["current_turn"]["turn_index"], 1);
        assert_eq!(view["current_turn"]["user_id"], author.to_string());
        assert_eq!(view["participants"][0]["role"], "author");
    }

    #[tokio::test]
    async fn test_create_story_with_client_id_returns_three_event_ids() {
        let state = app_state_with(Arc::new(EmptyEventRepository));
        let story_id = Uuid::new_v4();

        let (status, json) = send(
            &state,
            "POST",
            "/",
            Uuid::new_v4(),
            Some(json!({ "story_id": story_id, "title": "Tidewater" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["aggregate_id"], story_id.to_string());
        assert_eq!(json["event_ids"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_story_with_blank_title_is_400() {
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));

        let (status, json) =
            send(&state, "POST", "/", Uuid::new_v4(), Some(json!({ "title": "  " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_submit_segment_out_of_turn_is_403_and_in_turn_is_200() {
        // Arrange
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let author = Uuid::new_v4();
        let story_id = create(&state, author, json!({ "title": "Tidewater" })).await;
        let uri = format!("/{story_id}/segments");

        // Act
        let (stranger_status, stranger_json) =
            send(&state, "POST", &uri, Uuid::new_v4(), Some(json!({ "content": "Hi." }))).await;
        let (author_status, author_json) =
            send(&state, "POST", &uri, author, Some(json!({ "content": "The tide went out." })))
                .await;
        let (_, segments) = send(&state, "GET", &uri, author, None).await;

        // Assert
        assert_eq!(stranger_status, StatusCode::FORBIDDEN);
        assert_eq!(stranger_json["error"], "forbidden");
        assert_eq!(author_status, StatusCode::OK);
        assert!(author_json["resource_id"].is_string());
        assert_eq!(segments.as_array().unwrap().len(), 1);
        assert_eq!(segments[0]["word_count"], 4);
        assert_eq!(segments[0]["turn"], 1);
    }

    #[tokio::test]
    async fn test_join_request_approval_flow() {
        // Arrange
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let author = Uuid::new_v4();
        let requester = Uuid::new_v4();
        let story_id = create(&state, author, json!({ "title": "Open Mic" })).await;

        // Act
        let (status, requested) =
            send(&state, "POST", &format!("/{story_id}/join-requests"), requester, None).await;
        let request_id = requested["resource_id"].as_str().unwrap().to_owned();
        let approve_uri = format!("/{story_id}/join-requests/{request_id}/approve");
        let (by_requester, _) = send(&state, "POST", &approve_uri, requester, None).await;
        let (by_author, approved) = send(&state, "POST", &approve_uri, author, None).await;
        let (again, again_json) = send(&state, "POST", &approve_uri, author, None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_requester, StatusCode::FORBIDDEN);
        assert_eq!(by_author, StatusCode::OK);
        assert_eq!(approved["event_ids"].as_array().unwrap().len(), 2);
        assert_eq!(again, StatusCode::CONFLICT);
        assert_eq!(again_json["error"], "conflict");
    }

    #[tokio::test]
    async fn test_join_request_on_private_story_is_403() {
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let story_id = create(
            &state,
            Uuid::new_v4(),
            json!({ "title": "Diary", "visibility": "private" }),
        )
        .await;

        let uri = format!("/{story_id}/join-requests");
        let (status, _) = send(&state, "POST", &uri, Uuid::new_v4(), None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invite_unregistered_user_is_404() {
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let author = Uuid::new_v4();
        let story_id = create(&state, author, json!({ "title": "Tidewater" })).await;

        let (status, json) = send(
            &state,
            "POST",
            &format!("/{story_id}/invite"),
            author,
            Some(json!({ "invitee_id": Uuid::new_v4() })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let author = Uuid::new_v4();
        let story_id = create(&state, author, json!({ "title": "Scratch" })).await;

        let (deleted, _) = send(&state, "DELETE", &format!("/{story_id}"), author, None).await;
        let (status, json) = send(&state, "GET", &format!("/{story_id}"), author, None).await;

        assert_eq!(deleted, StatusCode::OK);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "aggregate_not_found");
    }

    #[tokio::test]
    async fn test_list_stories_returns_visible_stories() {
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let author = Uuid::new_v4();
        create(&state, author, json!({ "title": "Public One" })).await;
        create(&state, author, json!({ "title": "Hidden", "visibility": "private" })).await;

        let (status, json) = send(&state, "GET", "/", Uuid::new_v4(), None).await;

        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Public One"]);
    }

    #[tokio::test]
    async fn test_update_settings_by_author() {
        let state = app_state_with(Arc::new(InMemoryEventRepository::new()));
        let author = Uuid::new_v4();
        let story_id = create(&state, author, json!({ "title": "Draft" })).await;

        let (status, _) = send(
            &state,
            "POST",
            &format!("/{story_id}/settings"),
            author,
            Some(json!({ "title": "Final", "max_segments": 5 })),
        )
        .await;
        let (_, view) = send(&state, "GET", &format!("/{story_id}"), author, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["settings"]["title"], "Final");
        assert_eq!(view["settings"]["max_segments"], 5);
    }

    #[tokio::test]
    async fn test_missing_content_field_is_422() {
        let state = app_state_with(Arc::new(EmptyEventRepository));

        let (status, _) = send(
            &state,
            "POST",
            &format!("/{}/segments", Uuid::new_v4()),
            Uuid::new_v4(),
            Some(json!({})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_story_returns_500_when_repository_fails() {
        let state = app_state_with(Arc::new(FailingEventRepository));

        let uri = format!("/{}", Uuid::new_v4());
        let (status, json) = send(&state, "GET", &uri, Uuid::new_v4(), None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }
}
