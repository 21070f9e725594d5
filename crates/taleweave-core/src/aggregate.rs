//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// An aggregate rebuilt from its event stream and extended by commands.
///
/// `version` counts only events read from the store; events recorded since
/// the load wait in `uncommitted_events` until they are appended at that
/// version.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Number of persisted events replayed into this instance.
    fn version(&self) -> i64;

    /// Folds a stored event into state during reconstitution.
    fn apply(&mut self, event: &Self::Event);

    /// Events recorded by commands since the last load.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Drops the recorded events once they are persisted.
    fn clear_uncommitted_events(&mut self);

    /// Sequence number the next recorded event will take.
    fn next_sequence_number(&self) -> i64 {
        let pending = i64::try_from(self.uncommitted_events().len()).unwrap_or(i64::MAX - 1);
        self.version().saturating_add(pending).saturating_add(1)
    }
}
