//! Page views returned by the handlers.
//!
//! Each view is a plain struct that may carry a [`Flash`] describing the
//! outcome of the request that produced it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;

use crate::store::{Url, UrlCheck};

/// Flash severity, mirrored by the view layer's styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Danger,
}

/// One-shot status message attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub message: String,
    pub kind: FlashKind,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { message: message.into(), kind: FlashKind::Success }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), kind: FlashKind::Info }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { message: message.into(), kind: FlashKind::Danger }
    }
}

/// Landing page.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub flash: Option<Flash>,
}

/// A stored site with its most recent check, if any.
#[derive(Debug, Clone, Serialize)]
pub struct UrlListItem {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_check_at: Option<DateTime<Utc>>,
    pub last_status_code: Option<i32>,
}

impl UrlListItem {
    pub fn new(url: Url, latest: Option<&UrlCheck>) -> Self {
        Self {
            id: url.id,
            name: url.name,
            created_at: url.created_at,
            last_check_at: latest.map(|c| c.created_at),
            last_status_code: latest.map(|c| c.status_code),
        }
    }
}

/// Sites list.
#[derive(Debug, Clone, Serialize)]
pub struct UrlsPage {
    pub flash: Option<Flash>,
    pub urls: Vec<UrlListItem>,
}

/// One site and its check history, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct UrlPage {
    pub flash: Option<Flash>,
    pub url: Url,
    pub checks: Vec<UrlCheck>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_kind_serializes_lowercase() {
        let flash = Flash::danger("Incorrect URL");
        let json = serde_json::to_value(&flash).unwrap();

        assert_eq!(json["kind"], "danger");
        assert_eq!(json["message"], "Incorrect URL");
        assert_eq!(FlashKind::Info.to_string(), "info");
    }

    #[test]
    fn list_item_without_check_has_no_status() {
        let url = Url {
            id: 1,
            name: "https://example.com".into(),
            created_at: Utc::now(),
        };
        let item = UrlListItem::new(url, None);

        assert_eq!(item.last_status_code, None);
        assert_eq!(item.last_check_at, None);
    }
}
