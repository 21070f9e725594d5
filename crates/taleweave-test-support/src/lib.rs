//! Shared test mocks and utilities for the Taleweave storytelling service.

mod clock;
mod notifier;
mod repository;

pub use clock::{FixedClock, fixed_now};
pub use notifier::RecordingNotifier;
pub use repository::{
    EmptyEventRepository, FailingEventRepository, InMemoryEventRepository,
    RecordingEventRepository,
};
