//! Server-sent notification stream for the acting user.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{Router, routing::get};
use futures_util::Stream;
use tracing::{info, instrument, warn};

use crate::identity::ActingUser;
use crate::state::AppState;

/// GET /
///
/// Each notification is sent as an SSE event named after its type, with the
/// JSON notification as data. The stream ends when the client disconnects.
#[instrument(skip(state))]
async fn stream_events(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.notifications.subscribe(user_id);
    info!(subscribers = state.notifications.subscriber_count(), "notification stream opened");

    let stream = async_stream::stream! {
        while let Some(notification) = subscription.recv().await {
            match Event::default()
                .event(notification.kind.name())
                .json_data(&notification)
            {
                Ok(event) => yield Ok(event),
                Err(e) => warn!(error = %e, "failed to encode notification"),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Returns the router for the notification stream.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stream_events))
}
