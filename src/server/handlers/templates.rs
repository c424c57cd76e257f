//! Template CRUD handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::ApiError;
use crate::server::state::AppState;
use crate::template::{NewTemplate, Template, TemplatePatch};

/// Unparseable ids cannot name a stored template, so they read as not found.
pub(super) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Template not found"))
}

pub(super) async fn load(state: &AppState, raw_id: &str) -> Result<Template, ApiError> {
    let id = parse_id(raw_id)?;
    state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Template not found"))
}

/// GET /api/templates
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Template>>, ApiError> {
    let templates = state.store.list(&state.config.owner_id).await?;
    Ok(Json(templates))
}

/// GET /api/templates/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Template>, ApiError> {
    load(&state, &id).await.map(Json)
}

/// POST /api/templates
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewTemplate>, JsonRejection>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    let Json(new) = body?;
    new.validate().map_err(ApiError::invalid_template)?;

    let template = state.store.create(&state.config.owner_id, new).await?;
    tracing::info!(id = %template.id, title = %template.title, "template created");
    Ok((StatusCode::CREATED, Json(template)))
}

/// PUT /api/templates/:id
///
/// Shallow merge: fields missing from the body keep their stored values.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<TemplatePatch>, JsonRejection>,
) -> Result<Json<Template>, ApiError> {
    let Json(patch) = body?;
    let existing = load(&state, &id).await?;
    patch
        .clone()
        .merged(&existing)
        .validate()
        .map_err(ApiError::invalid_template)?;

    let updated = state
        .store
        .update(existing.id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Template not found"))?;
    tracing::info!(id = %updated.id, "template updated");
    Ok(Json(updated))
}

/// DELETE /api/templates/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.store.delete(id).await? {
        tracing::info!(id = %id, "template deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Template not found"))
    }
}
