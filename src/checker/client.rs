//! Outbound page fetches.

use std::time::Instant;

use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::metrics;
use crate::store::NewUrlCheck;

use super::extract::{extract_signals, PageSignals};

/// Why a check got no HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Connect or read deadline passed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS, TCP or TLS setup failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport or redirect error.
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchFailure {
    fn from(e: reqwest::Error) -> Self {
        let (timeout, connect) = (e.is_timeout(), e.is_connect());
        let message = e.without_url().to_string();
        if timeout {
            FetchFailure::Timeout(message)
        } else if connect {
            FetchFailure::Connect(message)
        } else {
            FetchFailure::Request(message)
        }
    }
}

/// Outcome of one check attempt, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// HTTP status, or 0 when no response was obtained.
    pub status_code: i32,
    pub signals: PageSignals,
    /// Set only when no response was obtained.
    pub failure: Option<FetchFailure>,
}

impl PageReport {
    fn failed(failure: FetchFailure) -> Self {
        Self {
            status_code: 0,
            signals: PageSignals::default(),
            failure: Some(failure),
        }
    }

    /// Whether an HTTP response came back, whatever its status.
    pub fn fetched(&self) -> bool {
        self.failure.is_none()
    }

    /// Row to store for `url_id`.
    pub fn to_new_check(&self, url_id: i64) -> NewUrlCheck {
        NewUrlCheck {
            url_id,
            status_code: self.status_code,
            title: self.signals.title.clone(),
            h1: self.signals.h1.clone(),
            description: self.signals.description.clone(),
        }
    }
}

/// Statuses whose body is worth parsing.
fn is_extractable(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Read at most `cap` body bytes, dropping the connection on anything longer.
async fn read_capped(mut response: reqwest::Response, cap: usize) -> reqwest::Result<Vec<u8>> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = cap - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!(cap, "page body truncated");
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Fetches pages and extracts their SEO signals.
#[derive(Debug, Clone)]
pub struct PageChecker {
    http: reqwest::Client,
    /// Body bytes parsed at most; the rest of a larger page is not read.
    max_body_bytes: usize,
}

impl PageChecker {
    /// Build a checker with the configured timeouts and redirect limit.
    ///
    /// Once the redirect limit is hit the last 3xx response is kept as the
    /// result instead of turning into a transport error.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let max_redirects = config.max_redirects;
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .redirect(Policy::custom(move |attempt| {
                if attempt.previous().len() > max_redirects {
                    attempt.stop()
                } else {
                    attempt.follow()
                }
            }))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Run one GET against `target`. Never fails: transport errors become a
    /// report with status 0, body and parse problems become empty fields.
    #[instrument(skip(self))]
    pub async fn check(&self, target: &str) -> PageReport {
        let start = Instant::now();
        let report = self.fetch(target).await;
        metrics::record_page_check(report.fetched(), start);
        report
    }

    async fn fetch(&self, target: &str) -> PageReport {
        let response = match self.http.get(target).send().await {
            Ok(r) => r,
            Err(e) => {
                let failure = FetchFailure::from(e);
                warn!(%failure, "page check got no response");
                return PageReport::failed(failure);
            }
        };

        let status = response.status().as_u16();
        debug!(status, "page responded");

        let signals = if is_extractable(status) {
            match read_capped(response, self.max_body_bytes).await {
                Ok(body) => extract_signals(&String::from_utf8_lossy(&body)),
                Err(e) => {
                    warn!(error = %e.without_url(), status, "failed to read page body");
                    PageSignals::default()
                }
            }
        } else {
            PageSignals::default()
        };

        PageReport {
            status_code: i32::from(status),
            signals,
            failure: None,
        }
    }
}
