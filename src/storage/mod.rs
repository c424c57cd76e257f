//! # Template Storage
//!
//! [`TemplateStore`] is the persistence seam used by the HTTP server.
//!
//! ## Implementations
//!
//! | Store | Backing | Owner scoping |
//! |-------|---------|---------------|
//! | [`MemoryStore`] | insertion-ordered `Vec` behind a `RwLock` | per record |
//! | [`LocalLibrary`] | two JSON files in a directory | single user |
//!
//! Every call is its own transaction; concurrent updates to one id are
//! last-write-wins.

mod local;
mod memory;

pub use local::{CURRENT_TEMPLATE_KEY, LocalLibrary, TEMPLATES_KEY};
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::template::{NewTemplate, Template, TemplatePatch};

/// Owner assigned to every template when no authentication exists.
pub const DEFAULT_OWNER: &str = "template-user";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// CRUD over templates.
///
/// Methods take `&self`; implementations guard their state internally.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All templates belonging to `owner`, in creation order.
    async fn list(&self, owner: &str) -> StorageResult<Vec<Template>>;

    async fn get(&self, id: Uuid) -> StorageResult<Option<Template>>;

    /// Store a new template under a freshly assigned id.
    async fn create(&self, owner: &str, template: NewTemplate) -> StorageResult<Template>;

    /// Shallow-merge `patch` into the stored template. `None` if absent.
    async fn update(&self, id: Uuid, patch: TemplatePatch) -> StorageResult<Option<Template>>;

    /// Whether a template was removed.
    async fn delete(&self, id: Uuid) -> StorageResult<bool>;
}

// ============================================================================
// SHARED CONTRACT TESTS
// ============================================================================
