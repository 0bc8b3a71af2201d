//! URL record lifecycle service.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::UrlRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::{AppError, DuplicateField};
use crate::utils::code_generator::generate_code;

/// Creation attempts before giving up on finding a free short code.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Largest page size the list operation will serve.
const MAX_LIST_LIMIT: i64 = 100;

/// Service orchestrating the URL record lifecycle.
///
/// Holds no mutable state of its own: uniqueness and counter consistency are
/// delegated to the store's constraints and atomic increment, so one
/// instance is shared across all request tasks.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    visit_tx: mpsc::Sender<VisitEvent>,
}

impl UrlService {
    pub fn new(repository: Arc<dyn UrlRepository>, visit_tx: mpsc::Sender<VisitEvent>) -> Self {
        Self {
            repository,
            visit_tx,
        }
    }

    /// Shortens a URL, reusing the existing record when the same URL was
    /// already submitted.
    ///
    /// Creation retries with a freshly generated code on short-code
    /// collisions, up to [`MAX_CODE_ATTEMPTS`] times. Losing the create race
    /// on `original_url` to a concurrent writer is absorbed by re-fetching
    /// the winner's record; the caller never sees that conflict.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `original_url` is empty.
    /// Returns [`AppError::CodeGenerationExhausted`] when every attempt hit
    /// a short-code collision.
    pub async fn shorten_url(&self, original_url: &str) -> Result<ShortUrl, AppError> {
        if original_url.is_empty() {
            return Err(AppError::invalid_input("URL must not be empty", json!({})));
        }

        if let Some(existing) = self.repository.find_by_original_url(original_url).await? {
            return Ok(existing);
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_url = NewShortUrl {
                original_url: original_url.to_string(),
                short_code: generate_code()?,
            };

            match self.repository.create(new_url).await {
                Ok(record) => return Ok(record),
                Err(AppError::AlreadyExists {
                    field: DuplicateField::ShortCode,
                    ..
                }) => {
                    debug!(attempt, "short code collision, regenerating");
                }
                Err(AppError::AlreadyExists {
                    field: DuplicateField::OriginalUrl,
                    ..
                }) => {
                    // A concurrent writer shortened the same URL between the
                    // dedup check and the insert; reuse the winner's record.
                    if let Some(existing) =
                        self.repository.find_by_original_url(original_url).await?
                    {
                        return Ok(existing);
                    }
                    // The winner was deleted before the re-fetch; the next
                    // attempt gets to create the record itself.
                }
                Err(error) => return Err(error),
            }
        }

        warn!(
            attempts = MAX_CODE_ATTEMPTS,
            "short code retry budget exhausted"
        );
        Err(AppError::CodeGenerationExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Retrieves a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has that code.
    pub async fn get_url(&self, short_code: &str) -> Result<ShortUrl, AppError> {
        self.repository
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short URL not found", json!({ "short_code": short_code }))
            })
    }

    /// Resolves a short code to its original URL and queues a visit event.
    ///
    /// The counter update is fire-and-forget: a full queue costs one counter
    /// tick, never the redirect.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has that code. No visit
    /// event is emitted in that case.
    pub async fn redirect_url(&self, short_code: &str) -> Result<String, AppError> {
        let record = self.get_url(short_code).await?;

        if let Err(error) = self.visit_tx.try_send(VisitEvent::new(&record.short_code)) {
            warn!(short_code = %record.short_code, error = %error, "visit event dropped");
        }

        Ok(record.original_url)
    }

    /// Lists records, newest first. `limit` is capped at [`MAX_LIST_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `limit` or `offset` is negative.
    pub async fn list_urls(&self, limit: i64, offset: i64) -> Result<Vec<ShortUrl>, AppError> {
        if limit < 0 || offset < 0 {
            return Err(AppError::invalid_input(
                "limit and offset must be non-negative",
                json!({ "limit": limit, "offset": offset }),
            ));
        }

        self.repository.list(limit.min(MAX_LIST_LIMIT), offset).await
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has that code.
    pub async fn delete_url(&self, short_code: &str) -> Result<(), AppError> {
        self.repository.delete(short_code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Utc;

    fn record_from(new_url: NewShortUrl, id: i64) -> ShortUrl {
        let now = Utc::now();
        ShortUrl {
            id,
            original_url: new_url.original_url,
            short_code: new_url.short_code,
            visits: 0,
            created_at: now,
            updated_at: now,
            expires_at: None,
        }
    }

    fn existing_record(id: i64, short_code: &str, original_url: &str) -> ShortUrl {
        record_from(
            NewShortUrl {
                original_url: original_url.to_string(),
                short_code: short_code.to_string(),
            },
            id,
        )
    }

    fn service_with(mock_repo: MockUrlRepository) -> (UrlService, mpsc::Receiver<VisitEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (UrlService::new(Arc::new(mock_repo), tx), rx)
    }

    fn short_code_collision() -> AppError {
        AppError::already_exists(DuplicateField::ShortCode, "Short code already exists", json!({}))
    }

    fn original_url_collision() -> AppError {
        AppError::already_exists(DuplicateField::OriginalUrl, "URL already shortened", json!({}))
    }

    #[tokio::test]
    async fn test_shorten_url_creates_fresh_record() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(|new_url| {
                new_url.original_url == "https://example.com/a"
                    && new_url.short_code.len() == 6
                    && new_url.short_code.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .times(1)
            .returning(|new_url| Ok(record_from(new_url, 1)));

        let (service, _rx) = service_with(mock_repo);
        let record = service.shorten_url("https://example.com/a").await.unwrap();

        assert_eq!(record.original_url, "https://example.com/a");
        assert_eq!(record.visits, 0);
    }

    #[tokio::test]
    async fn test_shorten_url_rejects_empty_input() {
        let (service, _rx) = service_with(MockUrlRepository::new());

        let error = service.shorten_url("").await.unwrap_err();

        assert!(matches!(error, AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_shorten_url_reuses_existing_record() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .withf(|url| url == "https://example.com/a")
            .times(1)
            .returning(|url| Ok(Some(existing_record(5, "abc123", url))));
        mock_repo.expect_create().times(0);

        let (service, _rx) = service_with(mock_repo);
        let record = service.shorten_url("https://example.com/a").await.unwrap();

        assert_eq!(record.id, 5);
        assert_eq!(record.short_code, "abc123");
    }

    #[tokio::test]
    async fn test_shorten_url_retries_on_short_code_collision() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));

        let mut calls = 0;
        mock_repo
            .expect_create()
            .times(2)
            .returning(move |new_url| {
                calls += 1;
                if calls == 1 {
                    Err(short_code_collision())
                } else {
                    Ok(record_from(new_url, 1))
                }
            });

        let (service, _rx) = service_with(mock_repo);
        let record = service.shorten_url("https://example.com/a").await.unwrap();

        assert_eq!(record.original_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_shorten_url_exhausts_retry_budget() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .times(5)
            .returning(|_| Err(short_code_collision()));

        let (service, _rx) = service_with(mock_repo);
        let error = service.shorten_url("https://example.com/a").await.unwrap_err();

        assert!(matches!(
            error,
            AppError::CodeGenerationExhausted { attempts: 5 }
        ));
    }

    #[tokio::test]
    async fn test_shorten_url_absorbs_lost_dedup_race() {
        let mut mock_repo = MockUrlRepository::new();

        // First lookup sees nothing; the re-fetch after the lost race finds
        // the winner's record.
        let mut lookups = 0;
        mock_repo
            .expect_find_by_original_url()
            .times(2)
            .returning(move |url| {
                lookups += 1;
                if lookups == 1 {
                    Ok(None)
                } else {
                    Ok(Some(existing_record(9, "winner", url)))
                }
            });
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(original_url_collision()));

        let (service, _rx) = service_with(mock_repo);
        let record = service.shorten_url("https://example.com/a").await.unwrap();

        assert_eq!(record.id, 9);
        assert_eq!(record.short_code, "winner");
    }

    #[tokio::test]
    async fn test_shorten_url_retries_when_race_winner_vanishes() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .times(2)
            .returning(|_| Ok(None));

        // The winner's record is deleted before the re-fetch, so the next
        // attempt creates it.
        let mut calls = 0;
        mock_repo
            .expect_create()
            .times(2)
            .returning(move |new_url| {
                calls += 1;
                if calls == 1 {
                    Err(original_url_collision())
                } else {
                    Ok(record_from(new_url, 2))
                }
            });

        let (service, _rx) = service_with(mock_repo);
        let record = service.shorten_url("https://example.com/a").await.unwrap();

        assert_eq!(record.id, 2);
    }

    #[tokio::test]
    async fn test_shorten_url_propagates_store_errors() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::store_unavailable("down", json!({}))));

        let (service, _rx) = service_with(mock_repo);
        let error = service.shorten_url("https://example.com/a").await.unwrap_err();

        assert!(matches!(error, AppError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_get_url_found() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_short_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Ok(Some(existing_record(1, code, "https://example.com/a"))));

        let (service, _rx) = service_with(mock_repo);
        let record = service.get_url("abc123").await.unwrap();

        assert_eq!(record.short_code, "abc123");
    }

    #[tokio::test]
    async fn test_get_url_not_found() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let (service, _rx) = service_with(mock_repo);
        let error = service.get_url("nosuch").await.unwrap_err();

        assert!(matches!(error, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_redirect_url_emits_visit_event() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_short_code()
            .times(1)
            .returning(|code| Ok(Some(existing_record(1, code, "https://example.com/a"))));

        let (service, mut rx) = service_with(mock_repo);
        let target = service.redirect_url("abc123").await.unwrap();

        assert_eq!(target, "https://example.com/a");
        assert_eq!(rx.try_recv().unwrap().short_code, "abc123");
    }

    #[tokio::test]
    async fn test_redirect_url_unknown_code_emits_nothing() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let (service, mut rx) = service_with(mock_repo);
        let error = service.redirect_url("nosuch").await.unwrap_err();

        assert!(matches!(error, AppError::NotFound { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_redirect_url_survives_full_queue() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_short_code()
            .times(2)
            .returning(|code| Ok(Some(existing_record(1, code, "https://example.com/a"))));

        let (tx, _rx) = mpsc::channel(1);
        let service = UrlService::new(Arc::new(mock_repo), tx);

        // Second call overflows the single-slot queue; the redirect must
        // still succeed.
        service.redirect_url("abc123").await.unwrap();
        let target = service.redirect_url("abc123").await.unwrap();

        assert_eq!(target, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_list_urls_caps_limit() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_list()
            .withf(|&limit, &offset| limit == 100 && offset == 0)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let (service, _rx) = service_with(mock_repo);
        service.list_urls(100_000, 0).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_urls_passes_small_pages_through() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_list()
            .withf(|&limit, &offset| limit == 10 && offset == 20)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let (service, _rx) = service_with(mock_repo);
        service.list_urls(10, 20).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_urls_rejects_negative_values() {
        let (service, _rx) = service_with(MockUrlRepository::new());

        assert!(matches!(
            service.list_urls(-1, 0).await.unwrap_err(),
            AppError::InvalidInput { .. }
        ));
        assert!(matches!(
            service.list_urls(10, -1).await.unwrap_err(),
            AppError::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_url_propagates_not_found() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_delete()
            .withf(|code| code == "nosuch")
            .times(1)
            .returning(|_| Err(AppError::not_found("Short URL not found", json!({}))));

        let (service, _rx) = service_with(mock_repo);
        let error = service.delete_url("nosuch").await.unwrap_err();

        assert!(matches!(error, AppError::NotFound { .. }));
    }
}
