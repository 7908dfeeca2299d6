//! Site submission and page-check flows shared by the HTTP handlers.

use tracing::{info, instrument};

use crate::checker::{PageChecker, PageReport};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::normalize::normalize_url;
use crate::store::{Db, UrlRepository};

/// Result of submitting a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Stored under the returned id.
    Added(i64),
    /// The normalized name was already stored.
    AlreadyExists,
}

/// Normalize `input` and store it unless it is already known.
///
/// Malformed input surfaces as [`AppError::InvalidUrl`] and stores nothing.
/// A concurrent insert of the same name that wins the race is reported as
/// [`AddOutcome::AlreadyExists`] through the unique constraint.
#[instrument(skip(db))]
pub async fn add_url(db: &Db, input: &str) -> Result<AddOutcome> {
    let name = normalize_url(input)?;
    let urls = db.urls();

    if urls.exists_by_name(&name).await? {
        metrics::inc_urls_rejected("duplicate");
        return Ok(AddOutcome::AlreadyExists);
    }

    insert_new(&urls, &name).await
}

/// Insert a normalized `name`; losing the unique-constraint race to another
/// writer is [`AddOutcome::AlreadyExists`], not an error.
async fn insert_new(urls: &UrlRepository, name: &str) -> Result<AddOutcome> {
    match urls.save(name).await {
        Ok(id) => {
            metrics::inc_urls_added();
            info!(id, %name, "site added");
            Ok(AddOutcome::Added(id))
        }
        Err(AppError::Duplicate(_)) => {
            metrics::inc_urls_rejected("duplicate");
            Ok(AddOutcome::AlreadyExists)
        }
        Err(e) => Err(e),
    }
}

/// A persisted check together with what the fetch produced.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub check_id: i64,
    pub report: PageReport,
}

/// Check the stored site `url_id` and record the attempt.
///
/// Unknown ids fail with [`AppError::NotFound`] before any fetch. Fetch
/// failures are recorded as status 0; only storage errors propagate.
#[instrument(skip(db, checker))]
pub async fn run_check(db: &Db, checker: &PageChecker, url_id: i64) -> Result<CheckOutcome> {
    let url = db
        .urls()
        .find_by_id(url_id)
        .await?
        .ok_or_else(|| AppError::url_not_found(url_id))?;

    let report = checker.check(&url.name).await;
    let check_id = db.checks().save(&report.to_new_check(url.id)).await?;

    info!(
        check_id,
        url = %url.name,
        status = report.status_code,
        "page check recorded"
    );
    Ok(CheckOutcome { check_id, report })
}
