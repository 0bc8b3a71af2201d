//! URL record entity: the mapping between a short code and its original URL.

use chrono::{DateTime, Utc};

/// A stored short URL with its visit counter and timestamps.
///
/// The `short_code` and `original_url` are both unique across the store; the
/// timestamps and counter are owned by the store and never set by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortUrl {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input for creating a URL record.
///
/// The store assigns the id and timestamps and starts `visits` at zero.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub original_url: String,
    pub short_code: String,
}
