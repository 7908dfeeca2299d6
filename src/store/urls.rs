//! `urls` table access.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, instrument};

use crate::error::{AppError, Result};

use super::types::Url;

/// Reads and writes stored sites.
#[derive(Debug, Clone)]
pub struct UrlRepository {
    pool: SqlitePool,
}

impl UrlRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a site stamped with the current time and return its id.
    ///
    /// A name that is already stored yields [`AppError::Duplicate`].
    #[instrument(skip(self))]
    pub async fn save(&self, name: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO urls (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                debug!(id, "url saved");
                Ok(id)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Duplicate(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All sites, newest first.
    pub async fn find_all(&self) -> Result<Vec<Url>> {
        let urls = sqlx::query_as::<_, Url>(
            "SELECT id, name, created_at FROM urls ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(urls)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Url>> {
        let url = sqlx::query_as::<_, Url>("SELECT id, name, created_at FROM urls WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(url)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Url>> {
        let url = sqlx::query_as::<_, Url>("SELECT id, name, created_at FROM urls WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(url)
    }

    /// Exact-match lookup on the normalized name.
    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM urls WHERE name = ?)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }
}
