//! Domain events for the User Accounts context.

use serde::{Deserialize, Serialize};
use taleweave_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

/// Prefix shared by every account event type.
pub const ACCOUNTS_CONTEXT: &str = "accounts";

/// Event type for `UserRegistered`.
pub const USER_REGISTERED_EVENT_TYPE: &str = "accounts.user_registered";
/// Event type for `ProfileUpdated`.
pub const PROFILE_UPDATED_EVENT_TYPE: &str = "accounts.profile_updated";

/// Emitted when a user account is first registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegistered {
    /// The user identifier.
    pub user_id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Name shown next to contributions.
    pub display_name: String,
    /// Contact address.
    pub email: String,
}

/// Emitted when a user edits their profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdated {
    /// The user identifier.
    pub user_id: Uuid,
    /// New display name.
    pub display_name: String,
    /// New biography, if any.
    pub bio: Option<String>,
}

/// Event payload variants for the User Accounts context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AccountEventKind {
    /// A user registered.
    UserRegistered(UserRegistered),
    /// A user edited their profile.
    ProfileUpdated(ProfileUpdated),
}

impl AccountEventKind {
    /// Returns the event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered(_) => USER_REGISTERED_EVENT_TYPE,
            Self::ProfileUpdated(_) => PROFILE_UPDATED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the User Accounts context.
#[derive(Debug, Clone)]
pub struct AccountEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: AccountEventKind,
}

impl DomainEvent for AccountEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("AccountEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
