//! Visit event passed from the redirect path to the background worker.

/// A recorded visit to a short code, queued for asynchronous counting.
///
/// Decouples the redirect response from the counter write: the request path
/// only enqueues, and the worker applies the store-side atomic increment.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub short_code: String,
}

impl VisitEvent {
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
        }
    }
}
