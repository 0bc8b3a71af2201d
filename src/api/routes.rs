//! API route groups.

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    delete_url_handler, list_urls_handler, login_handler, profile_handler, register_handler,
    shorten_url_handler, url_info_handler,
};
use crate::state::AppState;

/// Management routes mounted under `/api`, gated by the Bearer token
/// middleware in [`crate::routes::app_router`].
///
/// # Endpoints
///
/// - `GET    /profile`      - Authenticated caller's account
/// - `POST   /urls`         - Shorten a URL
/// - `GET    /urls`         - List URL records (paginated)
/// - `GET    /urls/{code}`  - Record details for a short code
/// - `DELETE /urls/{code}`  - Delete a record
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile_handler))
        .route("/urls", post(shorten_url_handler).get(list_urls_handler))
        .route(
            "/urls/{code}",
            get(url_info_handler).delete(delete_url_handler),
        )
}

/// Public authentication routes mounted under `/auth`.
///
/// # Endpoints
///
/// - `POST /register` - Create an account, returns the user and a token
/// - `POST /login`    - Exchange credentials for a token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}
