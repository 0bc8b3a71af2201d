//! Repository trait for user account data access.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the user account store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL backend
/// - [`crate::infrastructure::persistence::InMemoryUserRepository`] - in-memory
///   store used by the integration tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] tagged with the violated field
    /// when the username or email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Finds a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all accounts, newest first. Consumed by the admin CLI.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Deletes a user account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account matches `id`.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
