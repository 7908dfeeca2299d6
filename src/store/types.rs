//! Persisted records.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored site, keyed by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Url {
    /// Generated id.
    pub id: i64,
    /// Normalized `scheme://host[:port]`.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// One recorded page check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UrlCheck {
    /// Generated id.
    pub id: i64,
    /// Owning site.
    pub url_id: i64,
    /// HTTP status, or 0 when no response was obtained.
    pub status_code: i32,
    pub title: String,
    pub h1: String,
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl UrlCheck {
    /// Whether the check got any HTTP response at all.
    pub fn responded(&self) -> bool {
        self.status_code != 0
    }
}

/// Fields of a check before it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUrlCheck {
    pub url_id: i64,
    pub status_code: i32,
    pub title: String,
    pub h1: String,
    pub description: String,
}
