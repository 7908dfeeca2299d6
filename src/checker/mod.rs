//! Page checks: fetch a site and extract its SEO signals.
//!
//! This module handles:
//! - The outbound GET with bounded connect/read timeouts
//! - Classifying transport failures
//! - Tolerant HTML extraction of title, first h1 and meta description

pub mod client;
pub mod extract;

pub use client::{FetchFailure, PageChecker, PageReport};
pub use extract::{extract_signals, PageSignals};
