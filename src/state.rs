//! Shared application state injected into handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, UrlService};
use crate::domain::visit_event::VisitEvent;

/// Application-wide shared state.
///
/// Cloned per request by Axum; every field is a cheap handle. The pool and
/// the visit sender are held directly so the health check can inspect them.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub base_url: String,
    pub url_service: Arc<UrlService>,
    pub auth_service: Arc<AuthService>,
    pub visit_tx: mpsc::Sender<VisitEvent>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        base_url: String,
        url_service: Arc<UrlService>,
        auth_service: Arc<AuthService>,
        visit_tx: mpsc::Sender<VisitEvent>,
    ) -> Self {
        Self {
            db,
            base_url,
            url_service,
            auth_service,
            visit_tx,
        }
    }
}
