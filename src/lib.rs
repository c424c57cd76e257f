//! # Template Composer - Document Template Editor Core
//!
//! Template Composer positions named text "variables" over a page background
//! and exports the result. It provides:
//!
//! - **Page model**: page size table and canvas pixel ↔ physical unit conversion
//! - **Editor**: a UI-agnostic state machine for selecting, editing and dragging variables
//! - **Export**: PDF, DOCX and JSON writers
//! - **Storage + HTTP**: template persistence and an axum API with image uploads
//!
//! ## Quick Start
//!
//! ```
//! use template_composer::{
//!     export::{self, ExportContext, ExportFormat},
//!     template::{Template, Variable},
//! };
//!
//! let mut template = Template::new();
//! template.title = "Invoice".into();
//! template.page_size = "letter".into();
//! template
//!     .add_variable(Variable::new("Customer", "Ada Lovelace", 100.0, 120.0))
//!     .unwrap();
//!
//! let pdf = export::export(&template, ExportFormat::Pdf, &ExportContext::default())?;
//! assert_eq!(pdf.file_name, "Invoice.pdf");
//! assert!(pdf.bytes.starts_with(b"%PDF-"));
//!
//! # Ok::<(), template_composer::error::ComposerError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`page`] | Page sizes and coordinate conversion |
//! | [`template`] | Template and variable data model |
//! | [`editor`] | Editor state machine, grid and notices |
//! | [`export`] | PDF / DOCX / JSON exporters |
//! | [`import`] | Image, DOCX and PDF import |
//! | [`media`] | Data URLs and image sniffing |
//! | [`storage`] | Template stores |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod editor;
pub mod error;
pub mod export;
pub mod import;
pub mod media;
pub mod page;
pub mod server;
pub mod storage;
pub mod template;

// Re-exports for convenience
pub use editor::Editor;
pub use error::ComposerError;
pub use page::{PageSize, PageSizeTable};
pub use template::{Template, Variable, VariableFormat};
