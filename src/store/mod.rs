//! SQLite persistence for sites and their page checks.
//!
//! `Db` owns the connection pool; the repositories borrow a clone of it and
//! run hand-written SQL. Connections are checked out per query and returned
//! to the pool when the query future completes or is dropped.

pub mod checks;
pub mod db;
pub mod types;
pub mod urls;

pub use checks::CheckRepository;
pub use db::Db;
pub use types::{NewUrlCheck, Url, UrlCheck};
pub use urls::UrlRepository;
