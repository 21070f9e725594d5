//! Route modules organized by bounded context.

pub mod events;
pub mod health;
pub mod invitations;
pub mod stories;
pub mod users;

use serde::Serialize;
use taleweave_core::repository::StoredEvent;
use uuid::Uuid;

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The aggregate the events were appended to.
    pub aggregate_id: Uuid,
    /// The entity the command created inside the aggregate, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<Uuid>,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

impl CommandResponse {
    pub(crate) fn new(aggregate_id: Uuid, stored_events: &[StoredEvent]) -> Self {
        Self {
            aggregate_id,
            resource_id: None,
            event_ids: stored_events.iter().map(|e| e.event_id).collect(),
        }
    }

    pub(crate) fn with_resource(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }
}
