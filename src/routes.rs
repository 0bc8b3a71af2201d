//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`         - Service info (public)
//! - `GET  /health`   - Health check: database, visit queue (public)
//! - `GET  /{code}`   - Short link redirect (public)
//! - `POST /auth/*`   - Registration and login (public)
//! - `/api/*`         - Management API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configurable allowed origins
//! - **Authentication** - Bearer token on the `/api` subtree
//! - **Path normalization** - Trailing slash handling

use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::{health_handler, info_handler, redirect_handler};
use crate::api::middleware::{auth, cors, tracing};
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// Static routes win over the `/{code}` capture, so `/health` is never
/// treated as a short code.
pub fn app_router(state: AppState, allowed_origins: &[String]) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let router = Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/auth", api::routes::auth_routes())
        .nest("/api", api_router)
        .with_state(state)
        .layer(cors::layer(allowed_origins))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
