//! Domain model for the Story Collaboration context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod values;
