//! Message API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::common::TestApp;

#[tokio::test]
async fn test_alice_and_bob_exchange() {
    let app = TestApp::new();
    let alice = app.register_named("Alice").await;
    let bob = app.register_named("Bob").await;

    let (status, hi) = app.send(&alice, &bob, "hi").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(hi["message"], "hi");
    assert_eq!(hi["sender"]["id"], alice.id.to_string());
    assert_eq!(hi["conversation"]["with_user"]["id"], bob.id.to_string());

    let (status, hello) = app.send(&bob, &alice, "hello").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(hello["conversation"]["id"], hi["conversation"]["id"]);

    let uri = format!(
        "/api/v1/conversations/{}/messages",
        hi["conversation"]["id"].as_str().unwrap()
    );
    let (status, history) = app.get(&uri, &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["hi", "hello"]);
    assert_eq!(history[1]["sender"]["name"], "Bob");
    assert_eq!(history[1]["is_read"], false);

    let (_, bob_list) = app.get("/api/v1/conversations", &bob.token).await;
    assert_eq!(bob_list[0]["unread_count"], 1);
    assert_eq!(bob_list[0]["last_message"]["id"], hello["id"]);
}

#[tokio::test]
async fn test_history_is_ordered_and_complete() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let mut conversation_id = String::new();
    for i in 0..10 {
        let (from, to) = if i % 3 == 0 { (&bob, &alice) } else { (&alice, &bob) };
        let (status, sent) = app.send(from, to, &format!("message {}", i)).await;
        assert_eq!(status, StatusCode::CREATED);
        conversation_id = sent["conversation"]["id"].as_str().unwrap().to_string();
    }

    let (_, history) = app
        .get(
            &format!("/api/v1/conversations/{}/messages", conversation_id),
            &bob.token,
        )
        .await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 10);

    let sent_at: Vec<&str> = history.iter().map(|m| m["sent_at"].as_str().unwrap()).collect();
    let parsed: Vec<chrono::DateTime<chrono::Utc>> =
        sent_at.iter().map(|s| s.parse().unwrap()).collect();
    assert!(parsed.windows(2).all(|w| w[0] <= w[1]));
    for (i, message) in history.iter().enumerate() {
        assert_eq!(message["message"], format!("message {}", i));
    }
}

#[test_case("" ; "empty")]
#[test_case("   \n\t" ; "whitespace only")]
#[tokio::test]
async fn test_blank_message_is_rejected(text: &str) {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, _) = app.send(&alice, &bob, text).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.get("/api/v1/conversations", &alice.token).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_message_is_rejected() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, _) = app.send(&alice, &bob, &"x".repeat(2001)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_message_to_self_is_rejected() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, _) = app.send(&alice, &alice, "note to self").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_message_to_unknown_user_is_404() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, _) = app
        .post(
            "/api/v1/messages",
            &alice.token,
            json!({ "user_id": uuid::Uuid::new_v4(), "message": "anyone?" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_outsider_cannot_read_history() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;
    let eve = app.register_user().await;
    let (_, sent) = app.send(&alice, &bob, "secret").await;

    let (status, body) = app
        .get(
            &format!(
                "/api/v1/conversations/{}/messages",
                sent["conversation"]["id"].as_str().unwrap()
            ),
            &eve.token,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.get("items").is_none());
}

#[tokio::test]
async fn test_history_of_unknown_conversation_is_404() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, _) = app
        .get(
            &format!("/api/v1/conversations/{}/messages", uuid::Uuid::new_v4()),
            &alice.token,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_case(json!({ "message": "hi" }) ; "missing user_id")]
#[test_case(json!({ "user_id": "not-a-uuid", "message": "hi" }) ; "malformed user_id")]
#[test_case(json!({ "user_id": 42, "message": "hi" }) ; "numeric user_id")]
#[tokio::test]
async fn test_malformed_send_body_is_validation_error(body: serde_json::Value) {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, response) = app.post("/api/v1/messages", &alice.token, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], 10007);
    assert!(response["message"].is_string());
}
