//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Identity of the authenticated caller, injected into request extensions.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

/// Authenticates requests using Bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// On success the validated user id is stored as a [`CurrentUser`] extension
/// for downstream handlers.
///
/// # Errors
///
/// Returns `401 Unauthorized` when the header is missing or malformed, or
/// when the token fails validation. Responses carry a
/// `WWW-Authenticate: Bearer` header.
pub async fn layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    let user_id = state.auth_service.validate_token(&token)?;

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(CurrentUser(user_id));

    Ok(next.run(request).await)
}
