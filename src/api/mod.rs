//! API layer: HTTP handlers, DTOs, middleware, and route groups.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
