//! Persistence seam for event streams.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::event::{DomainEvent, EventMetadata};

/// One row of an aggregate's event stream, payload already serialized.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub event_id: Uuid,
    /// Owning stream.
    pub aggregate_id: Uuid,
    /// Dotted name such as `stories.segment_submitted`; selects the payload shape.
    pub event_type: String,
    pub payload: serde_json::Value,
    /// 1-based position in the stream. Unique per aggregate.
    pub sequence_number: i64,
    pub correlation_id: Uuid,
    pub causation_id: Uuid,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

impl StoredEvent {
    /// Builds the stored form of a domain event.
    pub fn from_domain_event<E: DomainEvent>(event: &E) -> Self {
        let meta = event.metadata();
        Self {
            event_id: meta.event_id,
            aggregate_id: meta.aggregate_id,
            event_type: event.event_type().to_owned(),
            payload: event.to_payload(),
            sequence_number: meta.sequence_number,
            correlation_id: meta.correlation_id,
            causation_id: meta.causation_id,
            occurred_at: meta.occurred_at,
        }
    }

    /// Rebuilds the metadata half of a domain event from its stored form.
    #[must_use]
    pub fn metadata(&self) -> EventMetadata {
        EventMetadata {
            event_id: self.event_id,
            event_type: self.event_type.clone(),
            aggregate_id: self.aggregate_id,
            sequence_number: self.sequence_number,
            correlation_id: self.correlation_id,
            causation_id: self.causation_id,
            occurred_at: self.occurred_at,
        }
    }

    /// The bounded context that wrote this event: `event_type` up to the first dot.
    #[must_use]
    pub fn context(&self) -> &str {
        self.event_type
            .split_once('.')
            .map_or(self.event_type.as_str(), |(context, _)| context)
    }
}

/// Whether a loaded stream was written by some context other than `context`.
///
/// Every context shares one id space, so an id can name a stream of the wrong
/// kind. An empty stream belongs to nobody.
#[must_use]
pub fn is_foreign_stream(events: &[StoredEvent], context: &str) -> bool {
    events.first().is_some_and(|event| event.context() != context)
}

/// Append-only storage of aggregate streams.
///
/// Implementations must reject an append whose `expected_version` differs from
/// the highest stored sequence number with `DomainError::ConcurrencyConflict`,
/// and must store a batch atomically.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Every event of the stream in sequence order. Empty for an unknown id.
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError>;

    /// Appends `events` after `expected_version` (0 for a new stream).
    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError>;

    /// Returns the IDs of every aggregate whose stream contains an event of
    /// `event_type`, ordered by when that event occurred.
    async fn list_aggregate_ids(&self, event_type: &str) -> Result<Vec<Uuid>, DomainError>;
}
