//! User account entity.

use chrono::{DateTime, Utc};

/// A registered user account.
///
/// `password_hash` is an argon2 hash; the plaintext password never reaches
/// this type and the hash never leaves the service layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user account. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
