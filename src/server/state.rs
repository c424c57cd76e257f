//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::export::UploadDirLoader;
use crate::page::PageSizeTable;
use crate::storage::{DEFAULT_OWNER, TemplateStore};

/// Uploaded backgrounds larger than this are rejected.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Where templates are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    /// Lost on restart
    Memory,
    /// JSON library in a directory
    Directory(PathBuf),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:5000")
    pub listen_addr: String,
    /// Directory uploaded images are written to and served from
    pub upload_dir: PathBuf,
    /// Owner every template is filed under
    pub owner_id: String,
    pub max_upload_bytes: usize,
    pub store: StoreKind,
    pub page_sizes: PageSizeTable,
    /// Optional front-end build served at `/`
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            owner_id: DEFAULT_OWNER.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            store: StoreKind::Memory,
            page_sizes: PageSizeTable::builtin(),
            static_dir: None,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn TemplateStore>,
    /// Resolves `/api/uploads/...` backgrounds for server-side export
    pub images: UploadDirLoader,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn TemplateStore>) -> Self {
        let images = UploadDirLoader::new(config.upload_dir.clone());
        Self {
            config,
            store,
            images,
        }
    }
}
