//! Conversation API Tests

use axum::http::StatusCode;
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_conversation_is_idempotent() {
    let app = TestApp::new();
    let alice = app.register_named("Alice").await;
    let bob = app.register_named("Bob").await;

    let (status, first) = app
        .post("/api/v1/conversations", &alice.token, json!({ "user_id": bob.id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["with_user"]["id"], bob.id.to_string());
    assert_eq!(first["with_user"]["name"], "Bob");

    let (status, second) = app
        .post("/api/v1/conversations", &bob.token, json!({ "user_id": alice.id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["with_user"]["name"], "Alice");
}

#[tokio::test]
async fn test_concurrent_creates_share_one_conversation() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let requests = (0..8).map(|i| {
        let (from, to) = if i % 2 == 0 { (&alice, &bob) } else { (&bob, &alice) };
        app.post(
            "/api/v1/conversations",
            &from.token,
            json!({ "user_id": to.id }),
        )
    });
    let results = join_all(requests).await;

    let first_id = &results[0].1["id"];
    for (status, body) in &results {
        assert_eq!(*status, StatusCode::CREATED);
        assert_eq!(&body["id"], first_id);
    }

    let (_, list) = app.get("/api/v1/conversations", &alice.token).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_conversation_with_self_is_rejected() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, _) = app
        .post("/api/v1/conversations", &alice.token, json!({ "user_id": alice.id }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_conversation_with_unknown_user_is_404() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, _) = app
        .post(
            "/api/v1/conversations",
            &alice.token,
            json!({ "user_id": uuid::Uuid::new_v4() }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_conversation_for_participant_and_outsider() {
    let app = TestApp::new();
    let alice = app.register_named("Alice").await;
    let bob = app.register_named("Bob").await;
    let eve = app.register_named("Eve").await;
    let (_, created) = app
        .post("/api/v1/conversations", &alice.token, json!({ "user_id": bob.id }))
        .await;
    let uri = format!("/api/v1/conversations/{}", created["id"].as_str().unwrap());

    let (status, body) = app.get(&uri, &bob.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["with_user"]["name"], "Alice");

    let (status, body) = app.get(&uri, &eve.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 10004);
}

#[tokio::test]
async fn test_get_unknown_conversation_is_404() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, _) = app
        .get(
            &format!("/api/v1/conversations/{}", uuid::Uuid::new_v4()),
            &alice.token,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_conversation_id_is_400() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, body) = app.get("/api/v1/conversations/not-a-uuid", &alice.token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}

#[tokio::test]
async fn test_list_conversations_orders_by_latest_activity() {
    let app = TestApp::new();
    let alice = app.register_named("Alice").await;
    let bob = app.register_named("Bob").await;
    let carol = app.register_named("Carol").await;

    app.send(&bob, &alice, "from bob").await;
    app.send(&carol, &alice, "from carol").await;
    app.send(&carol, &alice, "carol again").await;

    let (status, list) = app.get("/api/v1/conversations", &alice.token).await;
    assert_eq!(status, StatusCode::OK);

    let entries = list.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["with_user"]["name"], "Carol");
    assert_eq!(entries[0]["unread_count"], 2);
    assert_eq!(entries[0]["last_message"]["sender"]["name"], "Carol");
    assert!(entries[0]["last_message"].get("message").is_none());
    assert_eq!(entries[1]["with_user"]["name"], "Bob");
    assert_eq!(entries[1]["unread_count"], 1);
}

#[tokio::test]
async fn test_deleted_counterpart_removes_conversation() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;
    let (_, sent) = app.send(&alice, &bob, "hello").await;
    let conversation_uri = format!(
        "/api/v1/conversations/{}",
        sent["conversation"]["id"].as_str().unwrap()
    );

    app.request(
        axum::http::Method::DELETE,
        &format!("/api/v1/users/{}", bob.id),
        Some(&bob.token),
        None,
    )
    .await;

    let (status, list) = app.get("/api/v1/conversations", &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    let (status, _) = app.get(&conversation_uri, &alice.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .get(&format!("{}/messages", conversation_uri), &alice.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
