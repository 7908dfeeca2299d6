//! `url_checks` table access.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, instrument};

use crate::error::Result;

use super::types::{NewUrlCheck, UrlCheck};

const SELECT_CHECK: &str =
    "SELECT id, url_id, status_code, title, h1, description, created_at FROM url_checks";

/// Reads and writes page check history.
#[derive(Debug, Clone)]
pub struct CheckRepository {
    pool: SqlitePool,
}

impl CheckRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a check stamped with the current time and return its id.
    #[instrument(skip(self, check), fields(url_id = check.url_id, status = check.status_code))]
    pub async fn save(&self, check: &NewUrlCheck) -> Result<i64> {
        let done = sqlx::query(
            r#"
            INSERT INTO url_checks (url_id, status_code, title, h1, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(check.url_id)
        .bind(check.status_code)
        .bind(&check.title)
        .bind(&check.h1)
        .bind(&check.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = done.last_insert_rowid();
        debug!(id, "url check saved");
        Ok(id)
    }

    /// Every check of one site, newest first.
    pub async fn find_by_url_id(&self, url_id: i64) -> Result<Vec<UrlCheck>> {
        let checks = sqlx::query_as::<_, UrlCheck>(&format!(
            "{SELECT_CHECK} WHERE url_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(url_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(checks)
    }

    /// Head of [`find_by_url_id`](Self::find_by_url_id), if any.
    pub async fn find_latest_by_url_id(&self, url_id: i64) -> Result<Option<UrlCheck>> {
        let check = sqlx::query_as::<_, UrlCheck>(&format!(
            "{SELECT_CHECK} WHERE url_id = ? ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(url_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(check)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UrlCheck>> {
        let check = sqlx::query_as::<_, UrlCheck>(&format!("{SELECT_CHECK} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(check)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::error::AppError;
    use crate::store::Db;

    use super::*;

    fn new_check(url_id: i64, status_code: i32, title: &str) -> NewUrlCheck {
        NewUrlCheck {
            url_id,
            status_code,
            title: title.to_string(),
            ..NewUrlCheck::default()
        }
    }

    #[tokio::test]
    async fn save_and_find_by_id() {
        let db = Db::open_memory().await.unwrap();
        let url_id = db.urls().save("https://example.com").await.unwrap();
        let repo = db.checks();

        let id = repo
            .save(&NewUrlCheck {
                url_id,
                status_code: 200,
                title: "T".into(),
                h1: "H".into(),
                description: "D".into(),
            })
            .await
            .unwrap();

        let check = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(check.url_id, url_id);
        assert_eq!(check.status_code, 200);
        assert_eq!(
            (check.title.as_str(), check.h1.as_str(), check.description.as_str()),
            ("T", "H", "D")
        );
        assert!(check.responded());
    }

    #[tokio::test]
    async fn failed_check_stores_empty_strings() {
        let db = Db::open_memory().await.unwrap();
        let url_id = db.urls().save("https://example.com").await.unwrap();
        let id = db.checks().save(&new_check(url_id, 0, "")).await.unwrap();

        let check = db.checks().find_by_id(id).await.unwrap().unwrap();
        assert_eq!(check.status_code, 0);
        assert_eq!(check.title, "");
        assert_eq!(check.h1, "");
        assert_eq!(check.description, "");
        assert!(!check.responded());
    }

    #[tokio::test]
    async fn history_is_newest_first_and_latest_is_head() {
        let db = Db::open_memory().await.unwrap();
        let url_id = db.urls().save("https://example.com").await.unwrap();
        let other_id = db.urls().save("https://other.example").await.unwrap();
        let repo = db.checks();

        let first = repo.save(&new_check(url_id, 200, "one")).await.unwrap();
        repo.save(&new_check(other_id, 200, "elsewhere")).await.unwrap();
        let second = repo.save(&new_check(url_id, 500, "two")).await.unwrap();
        let third = repo.save(&new_check(url_id, 0, "three")).await.unwrap();

        let history = repo.find_by_url_id(url_id).await.unwrap();
        let ids: Vec<i64> = history.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![third, second, first]);
        assert!(history.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let latest = repo.find_latest_by_url_id(url_id).await.unwrap();
        assert_eq!(latest.as_ref(), history.first());
    }

    #[tokio::test]
    async fn latest_is_none_without_checks() {
        let db = Db::open_memory().await.unwrap();
        let url_id = db.urls().save("https://example.com").await.unwrap();

        assert!(db.checks().find_latest_by_url_id(url_id).await.unwrap().is_none());
        assert!(db.checks().find_by_url_id(url_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_for_unknown_url_is_rejected() {
        let db = Db::open_memory().await.unwrap();

        let err = db.checks().save(&new_check(404, 200, "orphan")).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
