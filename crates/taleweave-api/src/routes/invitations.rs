//! Cross-story view of the acting user's invitations.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use tracing::instrument;

use taleweave_stories::application::query_handlers::{self, PendingInvitationView};

use crate::error::ApiError;
use crate::identity::ActingUser;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn list_pending_invitations(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
) -> Result<Json<Vec<PendingInvitationView>>, ApiError> {
    let pending =
        query_handlers::list_pending_invitations(user_id, &*state.event_repository).await?;
    Ok(Json(pending))
}

/// Returns the router for pending invitations.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_pending_invitations))
}
