//! Domain layer: entities, repository contracts, and the visit pipeline.
//!
//! Holds the business model with no knowledge of HTTP or SQL. The visit
//! pipeline lives here because lossless counting is a domain guarantee, not
//! a transport concern.

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
