//! Background worker applying queued visit increments.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::repositories::UrlRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;

/// Drains visit events and applies the store's atomic increment for each.
///
/// Runs until every sender half of the channel is dropped, then finishes
/// after the queue is empty, so events enqueued before shutdown still land.
///
/// Failures never propagate: a missing record means the URL was deleted
/// while the event sat in the queue, and a store error costs one counter
/// tick, nothing more.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    repository: Arc<dyn UrlRepository>,
) {
    while let Some(event) = rx.recv().await {
        match repository.increment_visits(&event.short_code).await {
            Ok(()) => {}
            Err(AppError::NotFound { .. }) => {
                debug!(
                    short_code = %event.short_code,
                    "dropping visit for a deleted short code"
                );
            }
            Err(error) => {
                warn!(
                    short_code = %event.short_code,
                    error = %error,
                    "failed to record visit"
                );
            }
        }
    }

    debug!("visit worker finished");
}
