//! Commands: a user's intent to change one aggregate.

use uuid::Uuid;

/// Implemented by every command payload so handlers can log and trace it uniformly.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Short snake_case name, e.g. `submit_segment`.
    fn command_type(&self) -> &'static str;

    /// Carried onto every event the command produces.
    fn correlation_id(&self) -> Uuid;

    /// Who is asking.
    fn actor_id(&self) -> Uuid;
}
