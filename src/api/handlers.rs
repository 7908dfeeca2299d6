//! HTTP API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::{self, AddOutcome};
use crate::checker::PageChecker;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::store::Db;

use super::views::{Flash, IndexPage, UrlListItem, UrlPage, UrlsPage};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage context.
    pub db: Db,
    /// Outbound page checker.
    pub checker: PageChecker,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state without a metrics exporter.
    pub fn new(db: Db, checker: PageChecker) -> Self {
        Self {
            db,
            checker,
            metrics: None,
        }
    }

    /// Attach the handle that renders `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Site submission form.
#[derive(Debug, Deserialize)]
pub struct UrlForm {
    /// Raw user input; a missing field counts as empty.
    #[serde(default)]
    pub url: String,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Landing page.
pub async fn index() -> Json<IndexPage> {
    Json(IndexPage { flash: None })
}

/// Submit a site. Always answers 200 with a flash unless storage fails.
pub async fn create_url(
    State(state): State<AppState>,
    Form(form): Form<UrlForm>,
) -> Result<Response> {
    let flash = match analyzer::add_url(&state.db, &form.url).await {
        Ok(AddOutcome::Added(_)) => Flash::success("Page successfully added"),
        Ok(AddOutcome::AlreadyExists) => Flash::info("Page already exists"),
        Err(AppError::InvalidUrl(reason)) => {
            debug!(input = %form.url, %reason, "rejected site submission");
            metrics::inc_urls_rejected("invalid");
            let flash = Flash::danger("Incorrect URL");
            return Ok(Json(IndexPage { flash: Some(flash) }).into_response());
        }
        Err(e) => return Err(e),
    };

    debug!(kind = %flash.kind, message = %flash.message, "site submission handled");
    Ok(Json(urls_page(&state, Some(flash)).await?).into_response())
}

/// All sites with their latest check.
pub async fn list_urls(State(state): State<AppState>) -> Result<Json<UrlsPage>> {
    Ok(Json(urls_page(&state, None).await?))
}

/// One site and its check history.
pub async fn show_url(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<UrlPage>> {
    Ok(Json(url_page(&state, id, None).await?))
}

/// Run a page check. Fetch failures still answer 200; only unknown ids (404)
/// and storage errors (500) escape.
pub async fn create_check(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UrlPage>> {
    let outcome = analyzer::run_check(&state.db, &state.checker, id).await?;

    let flash = match &outcome.report.failure {
        None => Flash::success("Page successfully checked"),
        Some(failure) => Flash::danger(format!("Could not check the page: {failure}")),
    };

    Ok(Json(url_page(&state, id, Some(flash)).await?))
}

/// Prometheus text exposition, 404 when no recorder is installed.
pub async fn metrics_export(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn urls_page(state: &AppState, flash: Option<Flash>) -> Result<UrlsPage> {
    let checks = state.db.checks();
    let urls = state.db.urls().find_all().await?;

    let mut items = Vec::with_capacity(urls.len());
    for url in urls {
        let latest = checks.find_latest_by_url_id(url.id).await?;
        items.push(UrlListItem::new(url, latest.as_ref()));
    }

    Ok(UrlsPage { flash, urls: items })
}

async fn url_page(state: &AppState, id: i64, flash: Option<Flash>) -> Result<UrlPage> {
    let url = state
        .db
        .urls()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::url_not_found(id))?;
    let checks = state.db.checks().find_by_url_id(id).await?;

    Ok(UrlPage { flash, url, checks })
}
