//! The error vocabulary shared by every bounded context.

use thiserror::Error;
use uuid::Uuid;

/// Every failure a command or query can report. The API layer maps each
/// variant to one HTTP status.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No stream exists for this id, or the aggregate was deleted.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// An entity inside an aggregate (invitation, join request, user) was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Another writer appended to the stream first.
    #[error("concurrency conflict on {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        aggregate_id: Uuid,
        /// Version the writer loaded.
        expected: i64,
        /// Version found at append time.
        actual: i64,
    },

    /// The command conflicts with the current state (duplicate, already decided, completed).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The acting user is not allowed to perform the command.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Malformed input: empty content, limits exceeded, bad settings.
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage or serialization failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
