//! CORS layers for browser clients of the SwiftTasks API.

use std::time::Duration;

use axum::http::{Method, header};
use tower_http::cors::CorsLayer;

/// Allows everything. Local development only.
pub fn permissive() -> CorsLayer {
    CorsLayer::permissive()
}

/// Credentialed access for the listed web app origins.
///
/// Session cookies travel with each request, so origins must be listed
/// explicitly. `PUT` is allowed for page reordering.
pub fn default(allowed_origins: &[&str]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(600))
}
