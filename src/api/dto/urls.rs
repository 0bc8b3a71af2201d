//! DTOs for the URL management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. Must be a well-formed absolute URL.
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// A URL record as returned by the API.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub original_url: String,
    pub short_code: String,
    /// Full short link derived from the configured public base URL.
    pub short_url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlResponse {
    pub fn from_record(record: ShortUrl, base_url: &str) -> Self {
        let short_url = format!("{}/{}", base_url.trim_end_matches('/'), record.short_code);

        Self {
            original_url: record.original_url,
            short_code: record.short_code,
            short_url,
            visits: record.visits,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

/// Response for the list endpoint, echoing the effective pagination.
#[derive(Debug, Serialize)]
pub struct ListUrlsResponse {
    pub urls: Vec<UrlResponse>,
    pub limit: i64,
    pub offset: i64,
}

/// Response for the delete endpoint.
#[derive(Debug, Serialize)]
pub struct DeleteUrlResponse {
    pub message: String,
}
