//! Taleweave: Story Collaboration bounded context.
//!
//! Responsible for the turn-rotation and participation state machine: who may
//! write next, how segments are bounded, and how invitations and join
//! requests turn users into participants.

pub mod application;
pub mod domain;
