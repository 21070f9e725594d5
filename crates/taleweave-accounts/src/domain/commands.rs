//! Commands for the User Accounts context.

use taleweave_core::command::Command;
use uuid::Uuid;

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The identity issued by the auth layer.
    pub user_id: Uuid,
    /// Requested handle.
    pub username: String,
    /// Name shown next to contributions.
    pub display_name: String,
    /// Contact address.
    pub email: String,
}

impl Command for RegisterUser {
    fn command_type(&self) -> &'static str {
        "accounts.register_user"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Uuid {
        self.user_id
    }
}

/// Command to edit a user's profile.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The profile being edited.
    pub user_id: Uuid,
    /// The user issuing the edit.
    pub actor_id: Uuid,
    /// New display name.
    pub display_name: String,
    /// New biography; `None` clears it.
    pub bio: Option<String>,
}

impl Command for UpdateProfile {
    fn command_type(&self) -> &'static str {
        "accounts.update_profile"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor_id(&self) -> Uuid {
        self.actor_id
    }
}
