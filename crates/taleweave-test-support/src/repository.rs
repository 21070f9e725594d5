//! `EventRepository` doubles for handler and route tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use taleweave_core::error::DomainError;
use taleweave_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

/// Serves a fixed stream for every id and keeps each append for inspection.
/// Does not check versions.
#[derive(Debug)]
pub struct RecordingEventRepository {
    load_result: Mutex<Vec<StoredEvent>>,
    appended: Mutex<Vec<(Uuid, i64, Vec<StoredEvent>)>>,
}

impl RecordingEventRepository {
    /// `load_result` is returned regardless of the requested id.
    #[must_use]
    pub fn new(load_result: Vec<StoredEvent>) -> Self {
        Self {
            load_result: Mutex::new(load_result),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// `(aggregate_id, expected_version, batch)` for each append so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(Uuid, i64, Vec<StoredEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.load_result.lock().unwrap().clone())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }

    async fn list_aggregate_ids(&self, event_type: &str) -> Result<Vec<Uuid>, DomainError> {
        let mut ids: Vec<Uuid> = Vec::new();
        for event in self.load_result.lock().unwrap().iter() {
            if event.event_type == event_type && !ids.contains(&event.aggregate_id) {
                ids.push(event.aggregate_id);
            }
        }
        Ok(ids)
    }
}

/// Knows no streams and discards appends.
#[derive(Debug)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }

    async fn list_aggregate_ids(&self, _event_type: &str) -> Result<Vec<Uuid>, DomainError> {
        Ok(vec![])
    }
}

fn unreachable_db() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

/// Fails every call as if the database were unreachable.
#[derive(Debug)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(unreachable_db())
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(unreachable_db())
    }

    async fn list_aggregate_ids(&self, _event_type: &str) -> Result<Vec<Uuid>, DomainError> {
        Err(unreachable_db())
    }
}

/// A stateful event store held in memory. Enforces the same optimistic
/// concurrency rule as the `PostgreSQL` repository, so multi-step scenarios
/// (create, invite, accept, submit...) can run without a database.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: Mutex<HashMap<Uuid, Vec<StoredEvent>>>,
    creation_order: Mutex<Vec<Uuid>>,
}

impl InMemoryEventRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events persisted for `aggregate_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stream_len(&self, aggregate_id: Uuid) -> usize {
        self.streams
            .lock()
            .unwrap()
            .get(&aggregate_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self
            .streams
            .lock()
            .unwrap()
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }
        let mut streams = self.streams.lock().unwrap();
        let stream = streams.entry(aggregate_id).or_default();
        let actual = stream.last().map_or(0, |e| e.sequence_number);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }
        if stream.is_empty() {
            self.creation_order.lock().unwrap().push(aggregate_id);
        }
        stream.extend_from_slice(events);
        Ok(())
    }

    async fn list_aggregate_ids(&self, event_type: &str) -> Result<Vec<Uuid>, DomainError> {
        let streams = self.streams.lock().unwrap();
        let ids = self
            .creation_order
            .lock()
            .unwrap()
            .iter()
            .copied()
            .filter(|id| {
                streams
                    .get(id)
                    .is_some_and(|events| events.iter().any(|e| e.event_type == event_type))
            })
            .collect();
        Ok(ids)
    }
}
