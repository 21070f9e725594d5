//! Application services for the User Accounts context.

pub mod command_handlers;
pub mod query_handlers;
