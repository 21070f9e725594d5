//! Domain events and the metadata every stored event carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

/// Envelope fields shared by all events, independent of payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name used to route the payload on load.
    pub event_type: String,
    /// Stream the event belongs to.
    pub aggregate_id: Uuid,
    /// 1-based position within the stream.
    pub sequence_number: i64,
    /// Ties together every event produced by one command.
    pub correlation_id: Uuid,
    /// The command or event that directly caused this one.
    pub causation_id: Uuid,
    /// When the event was recorded.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Metadata for an event recorded directly in response to a command, so
    /// causation and correlation coincide.
    #[must_use]
    pub fn caused_by_command(
        event_type: &str,
        aggregate_id: Uuid,
        sequence_number: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            aggregate_id,
            sequence_number,
            correlation_id,
            causation_id: correlation_id,
            occurred_at: clock.now(),
        }
    }
}

/// A payload-bearing event as seen by the event store.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// The stable type name stored next to the payload.
    fn event_type(&self) -> &'static str;

    /// The payload as JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// The envelope.
    fn metadata(&self) -> &EventMetadata;
}
