//! The acting user, as established by the authentication layer in front of
//! this service.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::ErrorBody;

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub Uuid);

/// Rejection for requests without a usable identity.
#[derive(Debug)]
pub struct Unauthenticated(&'static str);

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        ErrorBody::respond(StatusCode::UNAUTHORIZED, "unauthenticated", self.0.to_owned())
    }
}

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(Unauthenticated("missing x-user-id header"))?;
        raw.to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(ActingUser)
            .ok_or(Unauthenticated("x-user-id header is not a valid UUID"))
    }
}
