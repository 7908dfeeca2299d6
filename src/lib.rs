//! Page analyzer: store site URLs and check their pages for SEO signals.
//!
//! A site is submitted as free-form input, normalized to its origin
//! (`scheme://host[:port]`) and stored once. On demand the stored origin is
//! fetched and the HTTP status, `<title>`, first `<h1>` and meta description
//! are recorded as a timestamped check. Every check attempt is persisted,
//! including the ones that got no response (status `0`).
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`normalize`]: Site URL normalization
//! - [`store`]: SQLite repositories for sites and checks
//! - [`checker`]: Page fetch and signal extraction
//! - [`analyzer`]: Submission and check flows
//! - [`api`]: HTTP API
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod analyzer;
pub mod api;
pub mod checker;
pub mod config;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
