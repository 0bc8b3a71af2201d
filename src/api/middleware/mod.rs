//! HTTP middleware for authentication and request processing.

pub mod auth;
pub mod cors;
pub mod tracing;
