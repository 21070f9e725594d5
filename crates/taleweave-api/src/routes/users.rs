//! Routes for the User Accounts bounded context.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use taleweave_accounts::application::query_handlers::{self, UserView};
use taleweave_accounts::application::command_handlers;
use taleweave_accounts::domain::commands;

use crate::error::ApiError;
use crate::identity::ActingUser;
use crate::routes::CommandResponse;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    /// Unique handle.
    pub username: String,
    /// Name shown next to contributions.
    pub display_name: String,
    /// Contact address.
    pub email: String,
}

/// Request body for POST /{user_id}/profile.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub display_name: String,
    /// New biography; omit to clear.
    #[serde(default)]
    pub bio: Option<String>,
}

/// POST /
#[instrument(skip(state, request), fields(user_id = %user_id))]
async fn register_user(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::RegisterUser {
        correlation_id: Uuid::new_v4(),
        user_id,
        username: request.username,
        display_name: request.display_name,
        email: request.email,
    };

    info!(correlation_id = %command.correlation_id, "handling register_user command");

    let stored_events = command_handlers::handle_register_user(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse::new(user_id, &stored_events)))
}

/// GET /{user_id}
#[instrument(skip(state, _viewer))]
async fn get_user(
    State(state): State<AppState>,
    _viewer: ActingUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError> {
    let view = query_handlers::get_user_by_id(user_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// POST /{user_id}/profile
#[instrument(skip(state, request), fields(user_id = %user_id))]
async fn update_profile(
    State(state): State<AppState>,
    ActingUser(actor_id): ActingUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::UpdateProfile {
        correlation_id: Uuid::new_v4(),
        user_id,
        actor_id,
        display_name: request.display_name,
        bio: request.bio,
    };

    info!(correlation_id = %command.correlation_id, "handling update_profile command");

    let stored_events = command_handlers::handle_update_profile(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(CommandResponse::new(user_id, &stored_events)))
}

/// Returns the router for the accounts context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/{user_id}", get(get_user))
        .route("/{user_id}/profile", post(update_profile))
}
