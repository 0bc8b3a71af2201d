//! Data transfer objects for API requests and responses.

pub mod auth;
pub mod health;
pub mod pagination;
pub mod urls;
