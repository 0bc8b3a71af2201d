//! Pagination query parameters for list endpoints.

use serde::Deserialize;

/// Default page size when the query carries none.
const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination query parameters.
///
/// Values arrive as strings and are parsed leniently: an absent or
/// non-numeric value falls back to the defaults (`limit=10`, `offset=0`)
/// instead of rejecting the request. Parsed numbers, including negative
/// ones, pass through for the service to validate.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
}

impl PaginationParams {
    /// Resolves the effective `(limit, offset)` pair.
    pub fn resolve(&self) -> (i64, i64) {
        (
            parse_or(self.limit.as_deref(), DEFAULT_LIMIT),
            parse_or(self.offset.as_deref(), 0),
        )
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, offset: Option<&str>) -> PaginationParams {
        PaginationParams {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        assert_eq!(params(None, None).resolve(), (10, 0));
    }

    #[test]
    fn test_numeric_values_pass_through() {
        assert_eq!(params(Some("25"), Some("50")).resolve(), (25, 50));
    }

    #[test]
    fn test_non_numeric_falls_back_to_defaults() {
        assert_eq!(params(Some("abc"), Some("1.5")).resolve(), (10, 0));
        assert_eq!(params(Some(""), Some("")).resolve(), (10, 0));
    }

    #[test]
    fn test_negative_values_pass_through() {
        // The service rejects these; the boundary only parses.
        assert_eq!(params(Some("-5"), Some("-1")).resolve(), (-5, -1));
    }
}
