//! Handler for the short link redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Responds with 301 Moved Permanently; a code never changes its target once
/// issued. The visit counter is updated asynchronously by the background
/// worker and never delays or fails the redirect.
///
/// # Errors
///
/// Returns 404 if the short code does not exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let original_url = state.url_service.redirect_url(&code).await?;

    Ok(Redirect::permanent(&original_url))
}
