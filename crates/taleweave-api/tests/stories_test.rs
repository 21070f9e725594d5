//! Integration tests for the Story Collaboration context against `PostgreSQL`.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;
use taleweave_notifications::NotificationHub;
use uuid::Uuid;

async fn create_story(pool: &PgPool, author: Uuid, body: serde_json::Value) -> Uuid {
    let (status, json) =
        common::post_json(common::build_test_app(pool.clone()), "/api/v1/stories", author, &body)
            .await;
    assert_eq!(status, StatusCode::OK, "create failed: {json}");
    Uuid::parse_str(json["aggregate_id"].as_str().unwrap()).unwrap()
}

async fn invite_and_accept(pool: &PgPool, story_id: Uuid, author: Uuid, invitee: Uuid) {
    let (status, json) = common::post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{story_id}/invite"),
        author,
        &serde_json::json!({ "invitee_id": invitee }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "invite failed: {json}");
    let invitation_id = json["resource_id"].as_str().unwrap().to_owned();

    let (status, json) = common::post_empty(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{story_id}/invitations/{invitation_id}/accept"),
        invitee,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "accept failed: {json}");
}

async fn submit(
    pool: &PgPool,
    story_id: Uuid,
    user: Uuid,
    content: &str,
) -> (StatusCode, serde_json::Value) {
    common::post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{story_id}/segments"),
        user,
        &serde_json::json!({ "content": content }),
    )
    .await
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_full_story_lifecycle(pool: PgPool) {
    // Arrange
    let author = Uuid::new_v4();
    let guest = Uuid::new_v4();
    common::register(&pool, author, "lighthouse").await;
    common::register(&pool, guest, "keeper").await;
    let story_id = create_story(
        &pool,
        author,
        serde_json::json!({ "title": "The Lamp", "max_segments": 3, "visibility": "private" }),
    )
    .await;
    invite_and_accept(&pool, story_id, author, guest).await;

    // Act: author, guest, author; the third segment completes the story.
    let (first, _) = submit(&pool, story_id, author, "The lamp flickered.").await;
    let (out_of_turn, out_of_turn_json) = submit(&pool, story_id, author, "Again!").await;
    let (second, _) = submit(&pool, story_id, guest, "Oil was low.").await;
    let (third, _) = submit(&pool, story_id, author, "Darkness.").await;
    let (after_end, after_end_json) = submit(&pool, story_id, guest, "Wait.").await;

    // Assert
    assert_eq!(first, StatusCode::OK);
    assert_eq!(out_of_turn, StatusCode::FORBIDDEN);
    assert_eq!(out_of_turn_json["error"], "forbidden");
    assert_eq!(second, StatusCode::OK);
    assert_eq!(third, StatusCode::OK);
    assert_eq!(after_end, StatusCode::CONFLICT);
    assert_eq!(after_end_json["error"], "conflict");

    let (status, view) = common::get_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{story_id}"),
        guest,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["completed"], true);
    assert!(view["current_turn"].is_null());
    assert_eq!(view["segment_count"], 3);
    assert_eq!(view["participants"].as_array().unwrap().len(), 2);

    let (_, segments) = common::get_json(
        common::build_test_app(pool),
        &format!("/api/v1/stories/{story_id}/segments"),
        author,
    )
    .await;
    let turns: Vec<u64> = segments
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["turn"].as_u64().unwrap())
        .collect();
    assert_eq!(turns, vec![1, 2, 3]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_private_story_is_hidden_from_strangers(pool: PgPool) {
    let author = Uuid::new_v4();
    let story_id = create_story(
        &pool,
        author,
        serde_json::json!({ "title": "Diary", "visibility": "private" }),
    )
    .await;

    let (status, json) = common::get_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{story_id}"),
        Uuid::new_v4(),
    )
    .await;
    let (_, listed) = common::get_json(
        common::build_test_app(pool),
        "/api/v1/stories",
        Uuid::new_v4(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
    assert!(listed.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pending_invitations_and_second_accept(pool: PgPool) {
    // Arrange
    let author = Uuid::new_v4();
    let invitee = Uuid::new_v4();
    common::register(&pool, invitee, "wanderer").await;
    let story_id = create_story(&pool, author, serde_json::json!({ "title": "Crossroads" })).await;
    let (_, invited) = common::post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{story_id}/invite"),
        author,
        &serde_json::json!({ "invitee_id": invitee }),
    )
    .await;
    let invitation_id = invited["resource_id"].as_str().unwrap().to_owned();

    // Act
    let (_, pending) = common::get_json(
        common::build_test_app(pool.clone()),
        "/api/v1/invitations",
        invitee,
    )
    .await;
    let accept_uri = format!("/api/v1/stories/{story_id}/invitations/{invitation_id}/accept");
    let (first, _) =
        common::post_empty(common::build_test_app(pool.clone()), &accept_uri, invitee).await;
    let (second, second_json) =
        common::post_empty(common::build_test_app(pool.clone()), &accept_uri, invitee).await;
    let (_, pending_after) = common::get_json(
        common::build_test_app(pool),
        "/api/v1/invitations",
        invitee,
    )
    .await;

    // Assert
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["invitation_id"], invitation_id);
    assert_eq!(pending[0]["story_title"], "Crossroads");
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(second_json["error"], "conflict");
    assert!(pending_after.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_submissions_admit_exactly_one_segment(pool: PgPool) {
    // Arrange
    let author = Uuid::new_v4();
    let guest = Uuid::new_v4();
    common::register(&pool, guest, "racer").await;
    let story_id =
        create_story(&pool, author, serde_json::json!({ "title": "Photo Finish" })).await;
    invite_and_accept(&pool, story_id, author, guest).await;

    // Act
    let (a, b) = tokio::join!(
        submit(&pool, story_id, author, "First past the post."),
        submit(&pool, story_id, author, "No, me."),
    );

    // Assert
    let statuses = [a.0, b.0];
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert!(
        statuses
            .iter()
            .any(|s| *s == StatusCode::CONFLICT || *s == StatusCode::FORBIDDEN),
        "unexpected statuses: {statuses:?}"
    );
    let (_, segments) = common::get_json(
        common::build_test_app(pool),
        &format!("/api/v1/stories/{story_id}/segments"),
        author,
    )
    .await;
    assert_eq!(segments.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_next_writer_is_notified(pool: PgPool) {
    // Arrange
    let author = Uuid::new_v4();
    let guest = Uuid::new_v4();
    common::register(&pool, guest, "listener").await;
    let story_id = create_story(&pool, author, serde_json::json!({ "title": "Relay" })).await;
    invite_and_accept(&pool, story_id, author, guest).await;
    let hub = NotificationHub::default();
    let mut subscription = hub.subscribe(guest);

    // Act
    let (status, _) = common::post_json(
        common::build_test_app_with_hub(pool, hub.clone()),
        &format!("/api/v1/stories/{story_id}/segments"),
        author,
        &serde_json::json!({ "content": "Your move." }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let notification = subscription.recv().await.unwrap();
    assert_eq!(notification.story_id, story_id);
    assert_eq!(notification.kind.name(), "turn");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_ids_of_the_wrong_kind_are_not_found_or_conflict(pool: PgPool) {
    // Arrange
    let author = Uuid::new_v4();
    let future_user = Uuid::new_v4();
    common::register(&pool, author, "cartographer").await;
    let story_id = create_story(&pool, author, serde_json::json!({ "title": "Blank Map" })).await;
    let squatted = create_story(
        &pool,
        author,
        serde_json::json!({ "story_id": future_user, "title": "Claimed" }),
    )
    .await;

    // Act
    let (story_as_user, story_as_user_json) = common::get_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{author}"),
        author,
    )
    .await;
    let (invite_story, invite_story_json) = common::post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/stories/{story_id}/invite"),
        author,
        &serde_json::json!({ "invitee_id": story_id }),
    )
    .await;
    let (user_as_story, _) = common::get_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{story_id}"),
        author,
    )
    .await;
    let (late_registration, late_registration_json) = common::post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        future_user,
        &serde_json::json!({
            "username": "latecomer",
            "display_name": "Latecomer",
            "email": "latecomer@example.com"
        }),
    )
    .await;

    // Assert
    assert_eq!(squatted, future_user);
    assert_eq!(story_as_user, StatusCode::NOT_FOUND);
    assert_eq!(story_as_user_json["error"], "aggregate_not_found");
    assert_eq!(invite_story, StatusCode::NOT_FOUND);
    assert_eq!(invite_story_json["error"], "not_found");
    assert_eq!(user_as_story, StatusCode::NOT_FOUND);
    assert_eq!(late_registration, StatusCode::CONFLICT);
    assert_eq!(late_registration_json["error"], "conflict");
}
