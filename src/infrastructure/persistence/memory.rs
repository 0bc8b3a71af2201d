//! In-memory store implementations.
//!
//! Behaviorally equivalent to the PostgreSQL repositories: the same unique
//! constraints, the same list ordering, and an increment that is atomic with
//! respect to concurrent callers. Backs the integration tests, which run the
//! handlers and the visit pipeline without a database.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::entities::{NewShortUrl, NewUser, ShortUrl, User};
use crate::domain::repositories::{UrlRepository, UserRepository};
use crate::error::{AppError, DuplicateField};

#[derive(Default)]
struct UrlTable {
    rows: Vec<ShortUrl>,
    next_id: i64,
}

/// In-memory [`UrlRepository`].
///
/// Every operation holds the table lock for its full duration, which gives
/// the increment the same lost-update-free behavior as the SQL
/// `visits = visits + 1` statement.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    table: Mutex<UrlTable>,
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut table = self.table.lock().await;

        if table.rows.iter().any(|r| r.short_code == new_url.short_code) {
            return Err(AppError::already_exists(
                DuplicateField::ShortCode,
                "Short code already exists",
                json!({ "short_code": new_url.short_code }),
            ));
        }
        if table
            .rows
            .iter()
            .any(|r| r.original_url == new_url.original_url)
        {
            return Err(AppError::already_exists(
                DuplicateField::OriginalUrl,
                "URL already shortened",
                json!({ "original_url": new_url.original_url }),
            ));
        }

        table.next_id += 1;
        let now = Utc::now();
        let record = ShortUrl {
            id: table.next_id,
            original_url: new_url.original_url,
            short_code: new_url.short_code,
            visits: 0,
            created_at: now,
            updated_at: now,
            expires_at: None,
        };
        table.rows.push(record.clone());

        Ok(record)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<ShortUrl>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|r| r.short_code == short_code).cloned())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortUrl>, AppError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .iter()
            .find(|r| r.original_url == original_url)
            .cloned())
    }

    async fn increment_visits(&self, short_code: &str) -> Result<(), AppError> {
        let mut table = self.table.lock().await;

        match table.rows.iter_mut().find(|r| r.short_code == short_code) {
            Some(record) => {
                record.visits += 1;
                Ok(())
            }
            None => Err(AppError::not_found(
                "Short URL not found",
                json!({ "short_code": short_code }),
            )),
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ShortUrl>, AppError> {
        let table = self.table.lock().await;

        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn delete(&self, short_code: &str) -> Result<(), AppError> {
        let mut table = self.table.lock().await;

        match table.rows.iter().position(|r| r.short_code == short_code) {
            Some(index) => {
                table.rows.remove(index);
                Ok(())
            }
            None => Err(AppError::not_found(
                "Short URL not found",
                json!({ "short_code": short_code }),
            )),
        }
    }
}

#[derive(Default)]
struct UserTable {
    rows: Vec<User>,
    next_id: i64,
}

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut table = self.table.lock().await;

        if table.rows.iter().any(|u| u.username == new_user.username) {
            return Err(AppError::already_exists(
                DuplicateField::Username,
                "Username already taken",
                json!({ "username": new_user.username }),
            ));
        }
        if table.rows.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::already_exists(
                DuplicateField::Email,
                "Email already registered",
                json!({ "email": new_user.email }),
            ));
        }

        table.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.next_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let table = self.table.lock().await;

        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(rows)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut table = self.table.lock().await;

        match table.rows.iter().position(|u| u.id == id) {
            Some(index) => {
                table.rows.remove(index);
                Ok(())
            }
            None => Err(AppError::not_found(
                "User not found",
                json!({ "user_id": id }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_url(short_code: &str, original_url: &str) -> NewShortUrl {
        NewShortUrl {
            original_url: original_url.to_string(),
            short_code: short_code.to_string(),
        }
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$not-a-real-hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_short_code() {
        let repo = InMemoryUrlRepository::default();
        repo.create(new_url("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let error = repo
            .create(new_url("abc123", "https://example.com/b"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            AppError::AlreadyExists {
                field: DuplicateField::ShortCode,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_original_url() {
        let repo = InMemoryUrlRepository::default();
        repo.create(new_url("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let error = repo
            .create(new_url("xyz789", "https://example.com/a"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            AppError::AlreadyExists {
                field: DuplicateField::OriginalUrl,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_increment_visits_unknown_code() {
        let repo = InMemoryUrlRepository::default();

        let error = repo.increment_visits("nosuch").await.unwrap_err();

        assert!(matches!(error, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let repo = InMemoryUrlRepository::default();
        repo.create(new_url("abc123", "https://example.com/a"))
            .await
            .unwrap();

        repo.delete("abc123").await.unwrap();

        assert!(repo.find_by_short_code("abc123").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("abc123").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let repo = InMemoryUrlRepository::default();
        for (code, url) in [
            ("code01", "https://example.com/1"),
            ("code02", "https://example.com/2"),
            ("code03", "https://example.com/3"),
        ] {
            repo.create(new_url(code, url)).await.unwrap();
        }

        let rows = repo.list(10, 0).await.unwrap();
        let codes: Vec<&str> = rows.iter().map(|r| r.short_code.as_str()).collect();

        assert_eq!(codes, ["code03", "code02", "code01"]);
    }

    #[tokio::test]
    async fn test_list_pages_have_no_overlap_or_gap() {
        let repo = InMemoryUrlRepository::default();
        for i in 0..3 {
            repo.create(new_url(&format!("code0{i}"), &format!("https://example.com/{i}")))
                .await
                .unwrap();
        }

        let first = repo.list(2, 0).await.unwrap();
        let second = repo.list(2, 2).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);

        let mut all: Vec<String> = first
            .iter()
            .chain(second.iter())
            .map(|r| r.short_code.clone())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_lose_no_updates() {
        let repo = Arc::new(InMemoryUrlRepository::default());
        repo.create(new_url("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..100 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.increment_visits("abc123").await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = repo.find_by_short_code("abc123").await.unwrap().unwrap();
        assert_eq!(record.visits, 100);
    }

    #[tokio::test]
    async fn test_user_create_rejects_duplicate_username_and_email() {
        let repo = InMemoryUserRepository::default();
        repo.create(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let username_error = repo
            .create(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        let email_error = repo
            .create(new_user("bob", "alice@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            username_error,
            AppError::AlreadyExists {
                field: DuplicateField::Username,
                ..
            }
        ));
        assert!(matches!(
            email_error,
            AppError::AlreadyExists {
                field: DuplicateField::Email,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_user_lookups_and_delete() {
        let repo = InMemoryUserRepository::default();
        let user = repo
            .create(new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(repo.find_by_id(user.id).await.unwrap().is_some());
        assert!(repo.find_by_username("alice").await.unwrap().is_some());
        assert!(repo.find_by_email("alice@example.com").await.unwrap().is_some());

        repo.delete(user.id).await.unwrap();

        assert!(repo.find_by_id(user.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(user.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
