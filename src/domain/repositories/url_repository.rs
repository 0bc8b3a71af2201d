//! Repository trait for URL record data access.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the URL record store.
///
/// Uniqueness of `short_code` and `original_url` is enforced by the store
/// itself, not by callers; races between concurrent writers surface as typed
/// [`AppError::AlreadyExists`] errors.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL backend
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - in-memory
///   store with the same observable behavior, used by the integration tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Creates a URL record with `visits = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] tagged with the violated field
    /// when `short_code` or `original_url` collides with an existing record.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Finds a record by its short code.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Finds the record that shortens `original_url`, if any.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<ShortUrl>, AppError>;

    /// Adds one to the record's visit counter, atomically in the store.
    ///
    /// Concurrent increments must all be applied; callers never
    /// read-modify-write the counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches `short_code`.
    async fn increment_visits(&self, short_code: &str) -> Result<(), AppError>;

    /// Lists records ordered by `created_at` descending, ties broken by `id`
    /// descending.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ShortUrl>, AppError>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches `short_code`.
    async fn delete(&self, short_code: &str) -> Result<(), AppError>;
}
