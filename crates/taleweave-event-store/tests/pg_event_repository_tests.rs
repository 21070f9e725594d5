//! `PgEventRepository` against a real database, one fresh schema per test.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use taleweave_core::clock::{Clock, SystemClock};
use taleweave_core::error::DomainError;
use taleweave_core::repository::{EventRepository, StoredEvent};
use taleweave_event_store::pg_event_repository::PgEventRepository;
use uuid::Uuid;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn segment_event(story_id: Uuid, sequence_number: i64) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id: story_id,
        event_type: "stories.segment_submitted".to_owned(),
        payload: serde_json::json!({ "content": "The lanterns went out one by one." }),
        sequence_number,
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
        occurred_at: t0() + Duration::seconds(sequence_number),
    }
}

fn batch(story_id: Uuid, sequence: RangeInclusive<i64>) -> Vec<StoredEvent> {
    sequence.map(|n| segment_event(story_id, n)).collect()
}

fn named(aggregate_id: Uuid, event_type: &str, minutes_after_t0: i64) -> StoredEvent {
    StoredEvent {
        event_type: event_type.to_owned(),
        occurred_at: t0() + Duration::minutes(minutes_after_t0),
        ..segment_event(aggregate_id, 1)
    }
}

fn sequence_of(events: &[StoredEvent]) -> Vec<i64> {
    events.iter().map(|e| e.sequence_number).collect()
}

fn assert_conflict(result: Result<(), DomainError>, story_id: Uuid, expected: i64, actual: i64) {
    match result {
        Err(DomainError::ConcurrencyConflict {
            aggregate_id,
            expected: got_expected,
            actual: got_actual,
        }) => {
            assert_eq!(aggregate_id, story_id);
            assert_eq!((got_expected, got_actual), (expected, actual));
        }
        other => panic!("wanted a concurrency conflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_stream_loads_as_empty(pool: PgPool) {
    let repo = PgEventRepository::new(pool);

    let events = repo.load_events(Uuid::new_v4()).await.unwrap();

    assert!(events.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_every_column_survives_the_round_trip(pool: PgPool) {
    // Arrange
    let repo = PgEventRepository::new(pool);
    let story_id = Uuid::new_v4();
    let written = segment_event(story_id, 1);

    // Act
    repo.append_events(story_id, 0, std::slice::from_ref(&written))
        .await
        .unwrap();
    let loaded = repo.load_events(story_id).await.unwrap();

    // Assert
    let [read] = loaded.as_slice() else {
        panic!("expected one event, got {}", loaded.len());
    };
    assert_eq!(read.event_id, written.event_id);
    assert_eq!(read.aggregate_id, story_id);
    assert_eq!(read.event_type, written.event_type);
    assert_eq!(read.payload, written.payload);
    assert_eq!(read.sequence_number, 1);
    assert_eq!(read.correlation_id, written.correlation_id);
    assert_eq!(read.causation_id, written.causation_id);
    assert_eq!(read.occurred_at, written.occurred_at);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_batches_accumulate_in_sequence_order(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let story_id = Uuid::new_v4();

    repo.append_events(story_id, 0, &batch(story_id, 1..=3))
        .await
        .unwrap();
    repo.append_events(story_id, 3, &batch(story_id, 4..=5))
        .await
        .unwrap();

    let loaded = repo.load_events(story_id).await.unwrap();
    assert_eq!(sequence_of(&loaded), vec![1, 2, 3, 4, 5]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_streams_do_not_leak_into_each_other(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    repo.append_events(first, 0, &batch(first, 1..=2)).await.unwrap();
    repo.append_events(second, 0, &batch(second, 1..=1)).await.unwrap();

    let first_events = repo.load_events(first).await.unwrap();
    let second_events = repo.load_events(second).await.unwrap();
    assert!(first_events.iter().all(|e| e.aggregate_id == first));
    assert_eq!(first_events.len(), 2);
    assert_eq!(second_events.len(), 1);
    assert_eq!(second_events[0].aggregate_id, second);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_two_writers_from_the_same_version_admit_only_one(pool: PgPool) {
    // Arrange
    let repo = PgEventRepository::new(pool);
    let story_id = Uuid::new_v4();
    repo.append_events(story_id, 0, &batch(story_id, 1..=3))
        .await
        .unwrap();

    // Act
    let winner = repo.append_events(story_id, 3, &batch(story_id, 4..=4)).await;
    let loser = repo.append_events(story_id, 3, &batch(story_id, 4..=4)).await;

    // Assert
    assert!(winner.is_ok());
    assert_conflict(loser, story_id, 3, 4);
    let loaded = repo.load_events(story_id).await.unwrap();
    assert_eq!(loaded.len(), 4);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_stale_version_is_rejected_even_without_sequence_overlap(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let story_id = Uuid::new_v4();
    repo.append_events(story_id, 0, &batch(story_id, 1..=2))
        .await
        .unwrap();

    let result = repo.append_events(story_id, 0, &batch(story_id, 3..=4)).await;

    assert_conflict(result, story_id, 0, 2);
    let loaded = repo.load_events(story_id).await.unwrap();
    assert_eq!(sequence_of(&loaded), vec![1, 2]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_empty_batch_writes_nothing(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let story_id = Uuid::new_v4();

    repo.append_events(story_id, 0, &[]).await.unwrap();

    assert!(repo.load_events(story_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_aggregate_ids_matches_type_and_orders_by_first_occurrence(pool: PgPool) {
    // Arrange
    let repo = PgEventRepository::new(pool);
    let older = Uuid::new_v4();
    let newer = Uuid::new_v4();
    let user = Uuid::new_v4();
    repo.append_events(newer, 0, &[named(newer, "stories.story_created", 5)])
        .await
        .unwrap();
    let older_stream = vec![
        named(older, "stories.story_created", 0),
        StoredEvent {
            sequence_number: 2,
            ..named(older, "stories.segment_submitted", 1)
        },
    ];
    repo.append_events(older, 0, &older_stream).await.unwrap();
    repo.append_events(user, 0, &[named(user, "accounts.user_registered", 0)])
        .await
        .unwrap();

    // Act
    let stories = repo.list_aggregate_ids("stories.story_created").await.unwrap();
    let nothing = repo.list_aggregate_ids("stories.nothing").await.unwrap();

    // Assert
    assert_eq!(stories, vec![older, newer]);
    assert!(nothing.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_non_ascii_segment_payload_is_stored_verbatim(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let story_id = Uuid::new_v4();
    let payload = serde_json::json!({
        "SegmentSubmitted": {
            "content": "Il était une fois… 物語が始まる",
            "word_count": 6,
            "nested": { "empty": [], "none": null }
        }
    });
    let event = StoredEvent {
        payload: payload.clone(),
        ..segment_event(story_id, 1)
    };

    repo.append_events(story_id, 0, &[event]).await.unwrap();

    let loaded = repo.load_events(story_id).await.unwrap();
    assert_eq!(loaded[0].payload, payload);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_system_clock_timestamps_come_back_unchanged(pool: PgPool) {
    let repo = PgEventRepository::new(pool);
    let story_id = Uuid::new_v4();
    let occurred_at = SystemClock.now();
    let event = StoredEvent {
        occurred_at,
        ..segment_event(story_id, 1)
    };

    repo.append_events(story_id, 0, &[event]).await.unwrap();

    let loaded = repo.load_events(story_id).await.unwrap();
    assert_eq!(loaded[0].occurred_at, occurred_at);
}
