//! # Export Module
//!
//! Turns a [`Template`] into a downloadable artifact.
//!
//! ## Formats
//!
//! | Format | Exporter | Content type | File name fallback |
//! |--------|----------|--------------|--------------------|
//! | PDF | [`PdfExporter`] | `application/pdf` | `document.pdf` |
//! | DOCX | [`DocxExporter`] | `application/vnd.openxmlformats-officedocument.wordprocessingml.document` | `document.docx` |
//! | JSON | [`JsonExporter`] | `application/json` | `template.json` |
//!
//! Exporters read the template and never modify it.
//!
//! ## Usage
//!
//! ```
//! use template_composer::export::{self, ExportContext, ExportFormat};
//! use template_composer::template::{Template, Variable};
//!
//! let mut template = Template::new();
//! template.title = "Invoice".into();
//! template.variables.push(Variable::new("Customer", "Ada", 100.0, 100.0));
//!
//! let ctx = ExportContext::default();
//! let artifact = export::export(&template, ExportFormat::Json, &ctx).unwrap();
//! assert_eq!(artifact.file_name, "Invoice.json");
//! ```

mod background;
pub mod docx;
pub mod json;
pub mod pdf;

pub use background::{DataUrlLoader, ImageLoader, UploadDirLoader};
pub use docx::{DocxExporter, DocxParagraph, docx_paragraphs};
pub use json::{JsonExporter, import_json};
pub use pdf::{Orientation, PdfExporter, PdfPlan, PlacedText};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::page::PageSizeTable;
use crate::template::{Template, ValidationError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Background image unavailable: {0}")]
    Background(String),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid template: {0}")]
    Invalid(#[from] ValidationError),
}

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Pdf, Self::Docx, Self::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Json => "json",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Json => "application/json",
        }
    }

    /// Stem used when the template title is blank.
    pub fn fallback_stem(self) -> &'static str {
        match self {
            Self::Json => "template",
            Self::Pdf | Self::Docx => "document",
        }
    }

    /// `{title}.{ext}`, or the format's fallback stem for a blank title.
    pub fn file_name(self, template: &Template) -> String {
        format!(
            "{}.{}",
            template.file_stem(self.fallback_stem()),
            self.extension()
        )
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" | "word" => Ok(Self::Docx),
            "json" => Ok(Self::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Everything an exporter needs besides the template itself.
pub struct ExportContext<'a> {
    pub page_sizes: &'a PageSizeTable,
    pub images: &'a dyn ImageLoader,
}

static BUILTIN_SIZES: std::sync::LazyLock<PageSizeTable> =
    std::sync::LazyLock::new(PageSizeTable::builtin);

impl Default for ExportContext<'static> {
    /// Built-in page sizes; backgrounds only from data URLs.
    fn default() -> Self {
        Self {
            page_sizes: &BUILTIN_SIZES,
            images: &DataUrlLoader,
        }
    }
}

impl<'a> ExportContext<'a> {
    pub fn new(page_sizes: &'a PageSizeTable, images: &'a dyn ImageLoader) -> Self {
        Self { page_sizes, images }
    }
}

/// A template to artifact converter for one format.
pub trait Exporter {
    fn format(&self) -> ExportFormat;

    fn export(&self, template: &Template, ctx: &ExportContext<'_>)
    -> Result<ExportArtifact, ExportError>;
}

/// The exporter registered for `format`.
pub fn exporter_for(format: ExportFormat) -> &'static dyn Exporter {
    match format {
        ExportFormat::Pdf => &PdfExporter,
        ExportFormat::Docx => &DocxExporter,
        ExportFormat::Json => &JsonExporter,
    }
}

/// Export `template` in `format`.
pub fn export(
    template: &Template,
    format: ExportFormat,
    ctx: &ExportContext<'_>,
) -> Result<ExportArtifact, ExportError> {
    let artifact = exporter_for(format).export(template, ctx)?;
    tracing::debug!(
        format = %format,
        file_name = %artifact.file_name,
        bytes = artifact.bytes.len(),
        "exported template"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("docx".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert!(matches!(
            "odt".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_file_name_fallbacks() {
        let mut template = Template::new();
        template.title = String::new();
        assert_eq!(ExportFormat::Pdf.file_name(&template), "document.pdf");
        assert_eq!(ExportFormat::Docx.file_name(&template), "document.docx");
        assert_eq!(ExportFormat::Json.file_name(&template), "template.json");
        template.title = "Offer".into();
        assert_eq!(ExportFormat::Pdf.file_name(&template), "Offer.pdf");
    }

    #[test]
    fn test_registry_matches_format() {
        for format in ExportFormat::ALL {
            assert_eq!(exporter_for(format).format(), format);
        }
    }
}
