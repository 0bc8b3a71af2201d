//! HTTP request handlers.
//!
//! Handlers stay thin: they validate the boundary, call a service, and shape
//! the response. Business rules live in the application layer.

pub mod auth;
pub mod health;
pub mod info;
pub mod redirect;
pub mod urls;

pub use auth::{login_handler, profile_handler, register_handler};
pub use health::health_handler;
pub use info::info_handler;
pub use redirect::redirect_handler;
pub use urls::{delete_url_handler, list_urls_handler, shorten_url_handler, url_info_handler};
