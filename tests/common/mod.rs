//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::faker::internet::en::Username;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use messenger_api::config::{CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, Settings};
use messenger_api::presentation::http::create_router;
use messenger_api::startup::AppState;

pub const PASSWORD: &str = "correct-horse-battery";

/// Settings for a router over the in-memory store
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-with-enough-bytes".into(),
            token_expiry_hours: 1,
        },
        cors: CorsSettings {
            allowed_origins: vec!["*".into()],
        },
        environment: "test".into(),
    }
}

/// A registered user with a valid token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Test application over a fresh in-memory store
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(test_settings());
        Self {
            router: create_router(state),
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Register with the given name and a generated email, then log in
    pub async fn register_named(&self, name: &str) -> TestUser {
        let email = unique_email();
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = body["id"].as_str().unwrap().parse().unwrap();

        let token = self.login(&email, PASSWORD).await;

        TestUser {
            id,
            name: name.to_string(),
            email,
            token,
        }
    }

    pub async fn register_user(&self) -> TestUser {
        let name: String = Name().fake();
        self.register_named(&name).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Send `text` from `from` to `to`
    pub async fn send(&self, from: &TestUser, to: &TestUser, text: &str) -> (StatusCode, Value) {
        self.post(
            "/api/v1/messages",
            &from.token,
            json!({ "user_id": to.id, "message": text }),
        )
        .await
    }
}

/// Lowercase email that is unique within a test run
pub fn unique_email() -> String {
    let user: String = Username().fake();
    let user: String = user
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}.{}@example.com", user, &suffix[..12])
}
