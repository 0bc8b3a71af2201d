//! Handler for the service info endpoint.

use axum::Json;
use serde_json::{Value, json};

/// Returns the service name and version.
///
/// # Endpoint
///
/// `GET /`
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
