//! Authentication API Tests

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use crate::common::{unique_email, TestApp, PASSWORD};

#[tokio::test]
async fn test_register_with_valid_data() {
    let app = TestApp::new();
    let email = unique_email();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "Alice", "email": email.to_uppercase(), "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], email.as_str());
    assert!(body["id"].is_string());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[test_case(json!({ "name": "Alice", "email": "not-an-email", "password": PASSWORD }) ; "invalid email")]
#[test_case(json!({ "name": "Alice", "email": "a@example.com", "password": "short" }) ; "short password")]
#[test_case(json!({ "name": "   ", "email": "a@example.com", "password": PASSWORD }) ; "blank name")]
#[test_case(json!({ "name": "Alice", "email": " a@example.com ", "password": PASSWORD }) ; "padded email")]
#[test_case(json!({ "name": "Alice", "password": PASSWORD }) ; "missing email")]
#[tokio::test]
async fn test_register_rejects_invalid_payload(body: serde_json::Value) {
    let app = TestApp::new();

    let (status, body) = app
        .request(Method::POST, "/api/v1/auth/register", None, Some(body))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}

#[tokio::test]
async fn test_register_with_duplicate_email_fails() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "Other", "email": user.email.to_uppercase(), "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 10005);
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": user.email, "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body["exp"].is_string());
}

#[test_case(None, Some("wrong-password-123") ; "wrong password")]
#[test_case(Some("nobody@example.com"), None ; "unknown email")]
#[tokio::test]
async fn test_login_with_bad_credentials_fails(email: Option<&str>, password: Option<&str>) {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({
                "email": email.unwrap_or(&user.email),
                "password": password.unwrap_or(PASSWORD),
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 10003);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let (status, _) = app
        .request(Method::GET, "/api/v1/users/@me", None, None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_garbage_token() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/v1/conversations", "not.a.jwt").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_instance_is_rejected() {
    let issuer = TestApp::new();
    let other = TestApp::new();
    let user = issuer.register_user().await;

    // Same secret, but the user does not exist in the other store.
    let (status, _) = other.get("/api/v1/users/@me", &user.token).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_unparseable_body_is_validation_error() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!(["not", "an", "object"])),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
}
