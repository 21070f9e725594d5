//! Taleweave event store: `PostgreSQL` persistence for aggregate streams.

pub mod pg_event_repository;
