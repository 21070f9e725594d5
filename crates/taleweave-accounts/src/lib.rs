//! Taleweave: User Accounts bounded context.
//!
//! Responsible for the identity and profile of the people writing stories.
//! Credentials and sessions belong to the external auth layer.

pub mod application;
pub mod domain;
