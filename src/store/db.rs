//! Connection pool and schema bootstrap.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::error::Result;

use super::checks::CheckRepository;
use super::urls::UrlRepository;

/// Schema statements, safe to run on every boot.
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS urls (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL UNIQUE,
        created_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS url_checks (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        url_id       INTEGER NOT NULL REFERENCES urls(id),
        status_code  INTEGER NOT NULL,
        title        TEXT NOT NULL DEFAULT '',
        h1           TEXT NOT NULL DEFAULT '',
        description  TEXT NOT NULL DEFAULT '',
        created_at   TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_url_checks_url ON url_checks (url_id, created_at DESC)",
];

/// Handle to the SQLite database.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open the pool at `database_url` and make sure the schema exists.
    ///
    /// An in-memory URL is pinned to a single long-lived connection, since
    /// every SQLite memory connection is its own database.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");

        let mut options = SqlitePoolOptions::new();
        if in_memory {
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            options = options.max_connections(max_connections.max(1));
        }

        let pool = options.connect(database_url).await?;
        let db = Db { pool };
        db.migrate().await?;

        info!(in_memory, "database ready");
        Ok(db)
    }

    /// Open a private in-memory database.
    pub async fn open_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("schema applied");
        Ok(())
    }

    /// Repository over the `urls` table.
    pub fn urls(&self) -> UrlRepository {
        UrlRepository::new(self.pool.clone())
    }

    /// Repository over the `url_checks` table.
    pub fn checks(&self) -> CheckRepository {
        CheckRepository::new(self.pool.clone())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
