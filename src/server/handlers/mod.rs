//! HTTP handlers for the server.

pub mod export;
pub mod page_sizes;
pub mod templates;
pub mod upload;

mod error;

pub use error::ApiError;

/// GET /api/health
pub async fn health() -> &'static str {
    "ok"
}
