//! Server-side export handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::ApiError;
use super::templates::load;
use crate::export::{self, ExportArtifact, ExportContext, ExportFormat};
use crate::server::state::AppState;
use crate::template::Template;

/// GET /api/templates/:id/export/:format
pub async fn export_stored(
    State(state): State<Arc<AppState>>,
    Path((id, format)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = format.parse()?;
    let template = load(&state, &id).await?;
    render(state, template, format).await
}

/// POST /api/export/:format
pub async fn export_posted(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    body: Result<Json<Template>, JsonRejection>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = format.parse()?;
    let Json(template) = body?;
    template.validate().map_err(ApiError::invalid_template)?;
    render(state, template, format).await
}

async fn render(
    state: Arc<AppState>,
    template: Template,
    format: ExportFormat,
) -> Result<Response, ApiError> {
    let id = template.id;
    let artifact = tokio::task::spawn_blocking(move || {
        let ctx = ExportContext::new(&state.config.page_sizes, &state.images);
        export::export(&template, format, &ctx)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Task error: {}", e)))??;

    tracing::info!(
        id = %id,
        format = %format,
        bytes = artifact.bytes.len(),
        "template exported"
    );
    Ok(attachment(artifact))
}

fn attachment(artifact: ExportArtifact) -> Response {
    let disposition = content_disposition(&artifact.file_name);
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(artifact.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// `attachment; filename="ascii"; filename*=UTF-8''percent-encoded`
fn content_disposition(file_name: &str) -> HeaderValue {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .filter(|&c| c != '"' && c != '\\')
        .collect();

    let mut encoded = String::new();
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    let value = format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}");
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_encodes_unicode() {
        let value = content_disposition("Café menu.pdf");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"Caf_ menu.pdf\"; filename*=UTF-8''Caf%C3%A9%20menu.pdf"
        );
    }
}
