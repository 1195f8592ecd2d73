//! User API Tests

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{unique_email, TestApp};

#[tokio::test]
async fn test_get_current_user_includes_email() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app.get("/api/v1/users/@me", &user.token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["email"], user.email.as_str());
}

#[tokio::test]
async fn test_get_other_user_hides_email() {
    let app = TestApp::new();
    let alice = app.register_named("Alice").await;
    let bob = app.register_named("Bob").await;

    let (status, body) = app
        .get(&format!("/api/v1/users/{}", bob.id), &alice.token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bob");
    assert!(body.get("email").is_none());
}

#[tokio::test]
async fn test_get_unknown_user_is_404() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app
        .get(&format!("/api/v1/users/{}", uuid::Uuid::new_v4()), &user.token)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 10001);
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = TestApp::new();
    let user = app.register_named("Before").await;
    let new_email = unique_email();

    let (status, body) = app
        .request(
            Method::PATCH,
            &format!("/api/v1/users/{}", user.id),
            Some(&user.token),
            Some(json!({
                "name": "After",
                "email": new_email,
                "photo_url": "https://cdn.example.com/a.png",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "After");
    assert_eq!(body["email"], new_email.as_str());
    assert_eq!(body["photo_url"], "https://cdn.example.com/a.png");

    // Old token still resolves to the same account.
    let (status, me) = app.get("/api/v1/users/@me", &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "After");
}

#[tokio::test]
async fn test_update_other_user_is_forbidden() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, _) = app
        .request(
            Method::PATCH,
            &format!("/api/v1/users/{}", bob.id),
            Some(&alice.token),
            Some(json!({ "name": "Hijacked" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_to_taken_email_conflicts() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, _) = app
        .request(
            Method::PATCH,
            &format!("/api/v1/users/{}", alice.id),
            Some(&alice.token),
            Some(json!({ "email": bob.email })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_own_account() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/users/{}", alice.id),
            Some(&alice.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app
        .get(&format!("/api/v1/users/{}", alice.id), &bob.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/v1/users/@me", &alice.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_other_user_is_forbidden() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/v1/users/{}", bob.id),
            Some(&alice.token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_users_with_search_and_paging() {
    let app = TestApp::new();
    let viewer = app.register_named("Viewer").await;
    for name in ["Anna Smith", "Hannah Jones", "Bob Stone"] {
        app.register_named(name).await;
    }

    let (status, body) = app.get("/api/v1/users?search=ANN", &viewer.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 2);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Anna Smith", "Hannah Jones"]);

    let (status, body) = app
        .get("/api/v1/users?page=2&per_page=3", &viewer.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    assert_eq!(body["total_items"], 4);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_users_page_past_end_is_rejected() {
    let app = TestApp::new();
    let viewer = app.register_user().await;

    let (status, body) = app.get("/api/v1/users?page=5", &viewer.token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}

#[tokio::test]
async fn test_list_users_malformed_query_is_validation_error() {
    let app = TestApp::new();
    let viewer = app.register_user().await;

    let (status, body) = app.get("/api/v1/users?page=abc", &viewer.token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}

#[tokio::test]
async fn test_malformed_user_id_is_validation_error() {
    let app = TestApp::new();
    let alice = app.register_user().await;

    let (status, body) = app.get("/api/v1/users/42", &alice.token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}
