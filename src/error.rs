//! # Error Types
//!
//! This module defines the top-level error type used throughout the
//! template-composer library. Each subsystem has its own error enum; they all
//! convert into [`ComposerError`] so binaries can propagate with `?`.

use thiserror::Error;

use crate::editor::EditorError;
use crate::export::ExportError;
use crate::import::ImportError;
use crate::storage::StorageError;
use crate::template::ValidationError;

/// Main error type for template-composer operations
#[derive(Debug, Error)]
pub enum ComposerError {
    /// A template or variable failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An editor action was not allowed in the current state
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    /// Export backend failure
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Import collaborator failure
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Template storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// HTTP server setup or runtime error
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
