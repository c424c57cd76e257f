//! Background image upload handlers.
//!
//! Files are written to the configured upload directory under a generated
//! name and served back from `/api/uploads/<name>`.

use axum::{
    Json,
    extract::{Multipart, State, rejection::JsonRejection},
    http::StatusCode,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::ApiError;
use crate::media::{DataUrl, ImageKind};
use crate::server::state::AppState;

/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "image";

pub const UPLOAD_URL_PREFIX: &str = "/api/uploads/";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUrlUpload {
    pub file_data: String,
    pub file_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUrlUploadResponse {
    pub url: String,
    pub file_name: String,
}

/// Lowercased extension including the dot, or empty.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn random_suffix() -> u32 {
    rand::rng().random_range(0..1_000_000_000)
}

/// `image-{millis}-{random}{ext}`
fn generated_name(ext: &str) -> String {
    format!(
        "{}-{}-{}{}",
        UPLOAD_FIELD,
        chrono::Utc::now().timestamp_millis(),
        random_suffix(),
        ext
    )
}

/// Keep only characters that are safe in a file name.
fn sanitize(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Images only: the MIME type and the extension must both name JPEG, PNG or GIF.
fn check_image_type(mime: &str, file_name: &str) -> Result<(), ApiError> {
    let mime_ok = ImageKind::from_mime(mime).is_some();
    let ext_ok = ImageKind::from_extension(&extension_of(file_name)).is_some();
    if mime_ok && ext_ok {
        Ok(())
    } else {
        Err(ApiError::bad_request("Only image files are allowed!"))
    }
}

fn check_size(state: &AppState, len: usize) -> Result<(), ApiError> {
    if len > state.config.max_upload_bytes {
        Err(ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "File too large (limit {} bytes)",
                state.config.max_upload_bytes
            ),
        ))
    } else {
        Ok(())
    }
}

async fn store_file(state: &AppState, name: &str, bytes: &[u8]) -> Result<String, ApiError> {
    let path = state.config.upload_dir.join(name);
    tokio::fs::write(&path, bytes).await.map_err(|e| {
        ApiError::internal(format!("Failed to save file {}: {}", path.display(), e))
    })?;
    tracing::info!(file = %name, bytes = bytes.len(), "stored upload");
    Ok(format!("{UPLOAD_URL_PREFIX}{name}"))
}

/// POST /api/upload - multipart upload, field `image`.
pub async fn multipart(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let mime = field.content_type().unwrap_or_default().to_string();
        check_image_type(&mime, &file_name)?;

        let bytes = field.bytes().await?;
        check_size(&state, bytes.len())?;

        let name = generated_name(&extension_of(&file_name));
        let url = store_file(&state, &name, &bytes).await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(ApiError::bad_request("No file uploaded"))
}

/// POST /api/upload/data-url - JSON `{fileData, fileName}` with a base64 data URL.
pub async fn data_url(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DataUrlUpload>, JsonRejection>,
) -> Result<Json<DataUrlUploadResponse>, ApiError> {
    let Json(upload) = body?;
    if upload.file_data.is_empty() || upload.file_name.trim().is_empty() {
        return Err(ApiError::bad_request("Missing file data or name"));
    }
    let decoded = DataUrl::parse(&upload.file_data)
        .map_err(|_| ApiError::bad_request("Invalid file data format"))?;
    check_image_type(&decoded.mime, &upload.file_name)?;
    check_size(&state, decoded.data.len())?;

    let name = format!(
        "{}-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        random_suffix(),
        sanitize(&upload.file_name)
    );
    let url = store_file(&state, &name, &decoded.data).await?;
    Ok(Json(DataUrlUploadResponse {
        url,
        file_name: name,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_name_shape() {
        let name = generated_name(".png");
        let parts: Vec<&str> = name.trim_end_matches(".png").split('-').collect();
        assert_eq!(parts[0], "image");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u32>().unwrap() < 1_000_000_000);
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_type_filter_needs_mime_and_extension() {
        assert!(check_image_type("image/png", "a.PNG").is_ok());
        assert!(check_image_type("image/jpeg", "photo.jpg").is_ok());
        assert!(check_image_type("image/png", "a.exe").is_err());
        assert!(check_image_type("application/pdf", "a.png").is_err());
        assert!(check_image_type("image/webp", "a.webp").is_err());
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("../../etc/pass wd.png"), "pass_wd.png");
    }
}
