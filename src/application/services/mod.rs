//! Application services orchestrating domain operations.

pub mod auth_service;
pub mod url_service;

pub use auth_service::AuthService;
pub use url_service::UrlService;
