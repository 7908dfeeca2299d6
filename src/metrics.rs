//! Prometheus metrics for site submissions and page checks.
//!
//! This module provides:
//! - Counters for added and rejected site URLs
//! - Page check outcomes and latency
//! - Installation of the Prometheus recorder served on `/metrics`

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::AppError;

// === Metric Name Constants ===

/// Sites stored counter metric name.
pub const METRIC_URLS_ADDED: &str = "urls_added_total";
/// Rejected submissions counter metric name.
pub const METRIC_URLS_REJECTED: &str = "urls_rejected_total";
/// Page checks counter metric name.
pub const METRIC_PAGE_CHECKS: &str = "page_checks_total";
/// Page check latency metric name.
pub const METRIC_PAGE_CHECK_LATENCY: &str = "page_check_latency_ms";

/// Install the global Prometheus recorder and describe all metrics.
/// Call this once at startup; the handle renders the `/metrics` body.
pub fn install_recorder() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Metrics(e.to_string()))?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_URLS_ADDED, "Total number of sites stored");
    describe_counter!(
        METRIC_URLS_REJECTED,
        "Total number of site submissions rejected, by reason"
    );
    describe_counter!(METRIC_PAGE_CHECKS, "Total number of page checks, by outcome");
    describe_histogram!(
        METRIC_PAGE_CHECK_LATENCY,
        "Page fetch and extraction latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Increment the stored sites counter.
pub fn inc_urls_added() {
    counter!(METRIC_URLS_ADDED).increment(1);
}

/// Increment the rejected submissions counter.
pub fn inc_urls_rejected(reason: &'static str) {
    counter!(METRIC_URLS_REJECTED, "reason" => reason).increment(1);
}

/// Record one page check and how long it took.
pub fn record_page_check(fetched: bool, start: Instant) {
    let outcome = if fetched { "fetched" } else { "failed" };
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    counter!(METRIC_PAGE_CHECKS, "outcome" => outcome).increment(1);
    histogram!(METRIC_PAGE_CHECK_LATENCY, "outcome" => outcome).record(latency_ms);
}
