//! HTTP API: site submission, listing, page checks, health and metrics.

pub mod handlers;
pub mod routes;
pub mod views;

pub use handlers::AppState;
pub use routes::create_router;
pub use views::{Flash, FlashKind};
