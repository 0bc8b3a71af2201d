//! Application error types and HTTP response mapping.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Standard error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error details included in API responses.
#[derive(Serialize)]
struct ErrorInfo {
    /// Machine-readable error code (e.g. "not_found").
    code: &'static str,
    /// Human-readable error message.
    message: String,
    /// Additional structured context.
    details: Value,
}

/// The uniqueness constraint violated by an insert.
///
/// Lets callers react to the specific collision: a `ShortCode` duplicate is
/// retried with a fresh code, an `OriginalUrl` duplicate means a concurrent
/// writer already shortened the same URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    ShortCode,
    OriginalUrl,
    Username,
    Email,
}

/// Application-wide error type.
///
/// Every variant carries a message and structured details that flow into the
/// JSON error body unchanged.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed validation (HTTP 400).
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// Requested resource does not exist (HTTP 404).
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Insert collided with an existing record (HTTP 409).
    #[error("{message}")]
    AlreadyExists {
        field: DuplicateField,
        message: String,
        details: Value,
    },

    /// Missing or invalid credentials (HTTP 401).
    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    /// No free short code found within the retry budget (HTTP 500).
    #[error("failed to allocate a unique short code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: u32 },

    /// The backing store rejected or failed an operation (HTTP 500).
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    /// Unexpected internal failure (HTTP 500).
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn already_exists(field: DuplicateField, message: impl Into<String>, details: Value) -> Self {
        Self::AlreadyExists {
            field,
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::InvalidInput { message, details } => {
                (StatusCode::BAD_REQUEST, "invalid_input", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::AlreadyExists {
                message, details, ..
            } => (StatusCode::CONFLICT, "already_exists", message, details),
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::CodeGenerationExhausted { attempts } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "code_generation_exhausted",
                "Failed to allocate a unique short code".to_string(),
                json!({ "attempts": attempts }),
            ),
            AppError::StoreUnavailable { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_unavailable",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::invalid_input("Validation failed", details)
    }
}

impl From<sqlx::Error> for AppError {
    /// Maps database errors, translating unique violations into
    /// [`AppError::AlreadyExists`] tagged with the violated field.
    ///
    /// Constraint names match the schema in `migrations/`.
    fn from(error: sqlx::Error) -> Self {
        if let Some(db_error) = error.as_database_error() {
            if db_error.is_unique_violation() {
                return match db_error.constraint() {
                    Some("urls_short_code_key") => AppError::already_exists(
                        DuplicateField::ShortCode,
                        "Short code already exists",
                        json!({ "constraint": "urls_short_code_key" }),
                    ),
                    Some("urls_original_url_key") => AppError::already_exists(
                        DuplicateField::OriginalUrl,
                        "URL already shortened",
                        json!({ "constraint": "urls_original_url_key" }),
                    ),
                    Some("users_username_key") => AppError::already_exists(
                        DuplicateField::Username,
                        "Username already taken",
                        json!({ "constraint": "users_username_key" }),
                    ),
                    Some("users_email_key") => AppError::already_exists(
                        DuplicateField::Email,
                        "Email already registered",
                        json!({ "constraint": "users_email_key" }),
                    ),
                    other => AppError::internal(
                        "Unexpected unique constraint violation",
                        json!({ "constraint": other }),
                    ),
                };
            }
        }

        AppError::store_unavailable("Database operation failed", json!({}))
    }
}
