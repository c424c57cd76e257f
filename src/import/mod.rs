//! # Import Module
//!
//! Turns a user-supplied file into something the editor can place.
//!
//! | Input | Result |
//! |-------|--------|
//! | `image/*` | [`ImportResult::Image`] with a data URL |
//! | DOCX | [`ImportResult::Text`] with the document text |
//! | PDF | [`ImportResult::Image`] of the first page, via a [`PdfRasterizer`] |
//! | anything else | [`ImportError::Unsupported`] |
//!
//! When the caller has no MIME type, it is guessed from the file name.

mod docx;

pub use docx::extract_docx_text;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::DataUrl;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MSWORD_MIME: &str = "application/msword";
pub const PDF_MIME: &str = "application/pdf";

/// Scale at which PDF pages are rasterized for use as a background.
pub const PDF_RENDER_SCALE: f32 = 1.5;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Could not read Word document: {0}")]
    Docx(String),

    #[error("Could not render PDF: {0}")]
    Pdf(String),
}

/// Extracted content, tagged the way front ends expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ImportResult {
    Text(String),
    /// A data URL
    Image(String),
}

/// Renders the first page of a PDF to a PNG.
pub trait PdfRasterizer: Send + Sync {
    fn rasterize_first_page(&self, pdf: &[u8], scale: f32) -> Result<Vec<u8>, ImportError>;
}

/// File importer. PDF support needs a rasterizer.
#[derive(Default)]
pub struct Importer {
    rasterizer: Option<Box<dyn PdfRasterizer>>,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rasterizer(mut self, rasterizer: impl PdfRasterizer + 'static) -> Self {
        self.rasterizer = Some(Box::new(rasterizer));
        self
    }

    /// Import `bytes`, dispatching on `mime` or, if empty, on `file_name`.
    pub fn import(
        &self,
        file_name: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<ImportResult, ImportError> {
        let mime = effective_mime(file_name, mime);
        tracing::debug!(file_name, mime = %mime, bytes = bytes.len(), "importing file");

        match mime.as_str() {
            PDF_MIME => {
                let rasterizer = self
                    .rasterizer
                    .as_ref()
                    .ok_or_else(|| ImportError::Unsupported(PDF_MIME.to_string()))?;
                let png = rasterizer.rasterize_first_page(bytes, PDF_RENDER_SCALE)?;
                Ok(ImportResult::Image(DataUrl::encode("image/png", &png)))
            }
            DOCX_MIME | MSWORD_MIME => extract_docx_text(bytes).map(ImportResult::Text),
            m if m.starts_with("image/") => Ok(ImportResult::Image(DataUrl::encode(m, bytes))),
            other => Err(ImportError::Unsupported(other.to_string())),
        }
    }
}

fn effective_mime(file_name: &str, mime: &str) -> String {
    let mime = mime.trim();
    if mime.is_empty() {
        mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    } else {
        mime.to_ascii_lowercase()
    }
}

/// File name without its extension, used to title imported text.
pub fn file_stem(file_name: &str) -> &str {
    std::path::Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(file_name)
}
