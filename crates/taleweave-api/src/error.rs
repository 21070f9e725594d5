//! Errors surfaced by the HTTP server: startup failures and request failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use taleweave_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Tracing or OpenTelemetry setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorBody {
    /// Builds a response with this body and `status`.
    pub(crate) fn respond(status: StatusCode, error: &'static str, message: String) -> Response {
        (status, Json(Self { error, message })).into_response()
    }
}

/// A `DomainError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    /// Status code and machine-readable code for the wrapped error.
    #[must_use]
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::AggregateNotFound(_) => (StatusCode::NOT_FOUND, "aggregate_not_found"),
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::ConcurrencyConflict { .. } => {
                (StatusCode::CONFLICT, "concurrency_conflict")
            }
            DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }
        ErrorBody::respond(status, code, self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use uuid::Uuid;

    #[test]
    fn test_every_domain_error_has_a_status_and_code() {
        let cases = [
            (
                DomainError::AggregateNotFound(Uuid::new_v4()),
                StatusCode::NOT_FOUND,
                "aggregate_not_found",
            ),
            (
                DomainError::NotFound("invitation".into()),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                DomainError::ConcurrencyConflict {
                    aggregate_id: Uuid::new_v4(),
                    expected: 1,
                    actual: 2,
                },
                StatusCode::CONFLICT,
                "concurrency_conflict",
            ),
            (
                DomainError::Conflict("already answered".into()),
                StatusCode::CONFLICT,
                "conflict",
            ),
            (
                DomainError::Forbidden("not your turn".into()),
                StatusCode::FORBIDDEN,
                "forbidden",
            ),
            (
                DomainError::Validation("empty segment".into()),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                DomainError::Infrastructure("db down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "infrastructure_error",
            ),
        ];

        for (err, status, code) in cases {
            let api_error = ApiError(err);
            assert_eq!(api_error.classify(), (status, code), "{:?}", api_error.0);
            assert_eq!(api_error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_body_carries_code_and_message() {
        let response = ApiError(DomainError::Forbidden("only the author may do that".into()))
            .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "forbidden");
        assert_eq!(json["message"], "forbidden: only the author may do that");
    }
}
