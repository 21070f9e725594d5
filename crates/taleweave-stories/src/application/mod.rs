//! Application services for the Story Collaboration context.

pub mod command_handlers;
mod notifications;
pub mod query_handlers;
