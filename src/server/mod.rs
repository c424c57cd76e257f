//! # HTTP Server for Template Storage and Export
//!
//! A thin JSON API over a [`TemplateStore`](crate::storage::TemplateStore),
//! plus background image uploads and server-side export.
//!
//! ## Usage
//!
//! ```bash
//! template-composer serve --listen 0.0.0.0:5000 --upload-dir ./uploads
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/api/templates` | list |
//! | POST | `/api/templates` | create |
//! | GET/PUT/DELETE | `/api/templates/:id` | get / update / delete |
//! | GET | `/api/templates/:id/export/:format` | export stored template |
//! | POST | `/api/export/:format` | export posted template |
//! | POST | `/api/upload` | multipart image upload |
//! | POST | `/api/upload/data-url` | data URL image upload |
//! | GET | `/api/uploads/*` | uploaded files |
//! | GET | `/api/page-sizes` | page size table |
//! | GET | `/api/health` | liveness |

mod handlers;
mod state;

pub use state::{AppState, DEFAULT_MAX_UPLOAD_BYTES, ServerConfig, StoreKind};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ComposerError;
use crate::storage::{LocalLibrary, MemoryStore, TemplateStore};

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Open the configured store and upload directory.
pub async fn build_state(config: ServerConfig) -> Result<Arc<AppState>, ComposerError> {
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let store: Arc<dyn TemplateStore> = match &config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Directory(dir) => Arc::new(LocalLibrary::open(dir).await?),
    };
    Ok(Arc::new(AppState::new(config, store)))
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;
    // Base64 grows payloads by a third
    let data_url_limit = state.config.max_upload_bytes / 3 * 4 + MULTIPART_OVERHEAD;

    let uploads = ServeDir::new(&state.config.upload_dir);
    let static_dir = state.config.static_dir.clone();

    let api = Router::new()
        // Templates
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::create),
        )
        .route(
            "/api/templates/:id",
            get(handlers::templates::get)
                .put(handlers::templates::update)
                .delete(handlers::templates::delete),
        )
        // Export
        .route(
            "/api/templates/:id/export/:format",
            get(handlers::export::export_stored),
        )
        .route("/api/export/:format", post(handlers::export::export_posted))
        // Uploads
        .route(
            "/api/upload",
            post(handlers::upload::multipart).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/upload/data-url",
            post(handlers::upload::data_url).layer(DefaultBodyLimit::max(data_url_limit)),
        )
        .nest_service("/api/uploads", uploads)
        // Misc
        .route("/api/page-sizes", get(handlers::page_sizes::list))
        .route("/api/health", get(handlers::health))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use template_composer::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), template_composer::error::ComposerError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:5000".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), ComposerError> {
    let listen_addr = config.listen_addr.clone();
    let state = build_state(config).await?;

    tracing::info!(
        listen = %listen_addr,
        upload_dir = %state.config.upload_dir.display(),
        store = ?state.config.store,
        owner = %state.config.owner_id,
        "template-composer server starting"
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| ComposerError::Server(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ComposerError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
