//! Repository traits defining data access contracts.
//!
//! These traits decouple the services from concrete storage. Production wires
//! in the PostgreSQL implementations; tests use mocks or the in-memory store.

pub mod url_repository;
pub mod user_repository;

pub use url_repository::UrlRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
