//! Concrete repository implementations.

pub mod memory;
pub mod pg_url_repository;
pub mod pg_user_repository;

pub use memory::{InMemoryUrlRepository, InMemoryUserRepository};
pub use pg_url_repository::PgUrlRepository;
pub use pg_user_repository::PgUserRepository;
