//! Page size table API.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::page::{CanvasSize, PageSize};
use crate::server::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSizeInfo {
    #[serde(flatten)]
    pub size: PageSize,
    /// Editor canvas size in pixels
    pub canvas: CanvasSize,
}

/// GET /api/page-sizes
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<PageSizeInfo>> {
    Json(
        state
            .config
            .page_sizes
            .iter()
            .map(|size| PageSizeInfo {
                size: size.clone(),
                canvas: size.canvas_size(),
            })
            .collect(),
    )
}
