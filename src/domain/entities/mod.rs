//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures with no behavior beyond construction.
//! Persistence concerns live in the repository implementations.

pub mod url;
pub mod user;

pub use url::{NewShortUrl, ShortUrl};
pub use user::{NewUser, User};
