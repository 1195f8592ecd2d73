//! CORS Middleware Configuration

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsSettings;

/// Build the CORS layer. An empty list or `"*"` allows any origin.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let allow_any = settings.allowed_origins.is_empty()
        || settings.allowed_origins.iter().any(|o| o.trim() == "*");

    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allow_any {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(origins).max_age(Duration::from_secs(3600))
}
