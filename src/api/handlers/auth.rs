//! Handlers for registration, login, and profile endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Errors
///
/// Returns 400 on validation failure and 409 when the username or email is
/// already taken.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let (user, token) = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Exchanges a username/password pair for a bearer token.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns 401 for unknown users and wrong passwords alike.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let (user, token) = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Returns the authenticated caller's account.
///
/// # Endpoint
///
/// `GET /api/profile`
pub async fn profile_handler(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth_service.get_user(current_user.0).await?;

    Ok(Json(user.into()))
}
