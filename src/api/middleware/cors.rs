//! Cross-origin resource sharing configuration.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

/// Builds the CORS layer from the configured allowed origins.
///
/// Credentialed requests are allowed, so origins are always listed
/// explicitly rather than using a wildcard. Origins that fail to parse as
/// header values are skipped.
pub fn layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
