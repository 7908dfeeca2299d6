//! Site URL normalization.
//!
//! A normalized URL is `scheme://host[:port]`: the port is kept only when it
//! differs from the scheme default, and path, query and fragment are dropped.
//! Normalized names are the dedup key for stored sites.

use url::Url;

use crate::error::AppError;

/// Schemes a page check can actually fetch.
const SUPPORTED_SCHEMES: [&str; 2] = ["http", "https"];

/// Normalize raw user input into a site origin.
pub fn normalize_url(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("url is empty".to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| AppError::InvalidUrl(e.to_string()))?;

    let scheme = parsed.scheme();
    if !SUPPORTED_SCHEMES.contains(&scheme) {
        return Err(AppError::InvalidUrl(format!("unsupported scheme: {scheme}")));
    }

    // The parser repairs `http:host` and `http:/host`; only explicit
    // authorities are accepted.
    let has_authority = trimmed
        .get(scheme.len()..)
        .is_some_and(|rest| rest.starts_with("://"));
    if !has_authority {
        return Err(AppError::InvalidUrl("url has no authority".to_string()));
    }

    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(AppError::InvalidUrl("url has no host".to_string())),
    };

    // `port()` is None for the scheme default, so 80/443 vanish here.
    Ok(match parsed.port() {
        Some(port) => format!("{scheme}://{host}:{port}"),
        None => format!("{scheme}://{host}"),
    })
}
