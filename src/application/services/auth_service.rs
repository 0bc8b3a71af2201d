//! Authentication service: registration, login, and token validation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::{AppError, DuplicateField};
use crate::utils::password::{hash_password, verify_password};

/// Claims carried by issued bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    exp: i64,
    iat: i64,
    nbf: i64,
}

/// Service issuing and validating bearer tokens for user accounts.
///
/// Tokens are HS256 JWTs signed with a secret injected at startup; the
/// secret never appears in source. Passwords are stored as Argon2id hashes
/// only.
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    /// Creates the service with the signing secret and token lifetime from
    /// configuration.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        jwt_secret: &str,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            repository,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Registers a new account and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] when the username or email is
    /// taken. The pre-checks give precise messages; a concurrent register
    /// slipping between check and insert is caught by the store's unique
    /// constraints and surfaces the same way.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AppError> {
        if self.repository.find_by_username(username).await?.is_some() {
            return Err(AppError::already_exists(
                DuplicateField::Username,
                "Username already taken",
                json!({ "username": username }),
            ));
        }

        if self.repository.find_by_email(email).await?.is_some() {
            return Err(AppError::already_exists(
                DuplicateField::Email,
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };

        let user = self.repository.create(new_user).await?;
        let token = self.generate_token(user.id)?;

        Ok((user, token))
    }

    /// Authenticates a username/password pair and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown username and for a
    /// wrong password alike; callers cannot probe which part was wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(Self::invalid_credentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(Self::invalid_credentials());
        }

        let token = self.generate_token(user.id)?;
        Ok((user, token))
    }

    /// Validates a bearer token and returns the user id it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for malformed, expired, or
    /// wrongly-signed tokens.
    pub fn validate_token(&self, token: &str) -> Result<i64, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or expired token" }),
                )
            })?;

        Ok(data.claims.user_id)
    }

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the id is unknown.
    pub async fn get_user(&self, user_id: i64) -> Result<User, AppError> {
        self.repository.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::not_found("User not found", json!({ "user_id": user_id }))
        })
    }

    fn generate_token(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to sign token", json!({ "reason": e.to_string() }))
        })
    }

    fn invalid_credentials() -> AppError {
        AppError::unauthorized("Invalid credentials", json!({}))
    }
}
