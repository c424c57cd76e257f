//! Single-user template library kept as JSON files in a directory.
//!
//! ```text
//! <dir>/template-editor-templates.json          every saved template
//! <dir>/template-editor-current-template.json   the template last saved or opened
//! ```
//!
//! A missing file reads as empty. A corrupt file also reads as empty and is
//! reported with a warning; the next write replaces it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{StorageResult, TemplateStore};
use crate::template::{NewTemplate, Template, TemplatePatch};

pub const TEMPLATES_KEY: &str = "template-editor-templates";
pub const CURRENT_TEMPLATE_KEY: &str = "template-editor-current-template";

#[derive(Debug)]
pub struct LocalLibrary {
    dir: PathBuf,
    // Serializes read-modify-write cycles on the library files
    lock: Mutex<()>,
}

impl LocalLibrary {
    /// Open (and create if needed) a library directory.
    pub async fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let path = self.path(key);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt library file");
                Ok(None)
            }
        }
    }

    /// Write through a temporary file so readers never see a partial file.
    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(value)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn templates(&self) -> StorageResult<Vec<Template>> {
        Ok(self.read_json(TEMPLATES_KEY).await?.unwrap_or_default())
    }

    /// The template most recently saved or marked current.
    pub async fn current(&self) -> StorageResult<Option<Template>> {
        self.read_json(CURRENT_TEMPLATE_KEY).await
    }

    pub async fn set_current(&self, template: &Template) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        self.write_json(CURRENT_TEMPLATE_KEY, template).await
    }

    pub async fn clear_current(&self) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        self.remove(CURRENT_TEMPLATE_KEY).await
    }

    /// Insert or replace `template` by id and make it current.
    pub async fn save(&self, template: &Template) -> StorageResult<()> {
        let _guard = self.lock.lock().await;
        self.save_locked(template).await
    }

    /// Caller must hold `self.lock`.
    async fn save_locked(&self, template: &Template) -> StorageResult<()> {
        let mut templates = self.templates().await?;
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => templates.push(template.clone()),
        }
        self.write_json(TEMPLATES_KEY, &templates).await?;
        self.write_json(CURRENT_TEMPLATE_KEY, template).await?;
        tracing::debug!(id = %template.id, "saved template to library");
        Ok(())
    }
}

#[async_trait]
impl TemplateStore for LocalLibrary {
    /// The library has a single user; `owner` is ignored.
    async fn list(&self, _owner: &str) -> StorageResult<Vec<Template>> {
        self.templates().await
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<Template>> {
        Ok(self.templates().await?.into_iter().find(|t| t.id == id))
    }

    async fn create(&self, _owner: &str, template: NewTemplate) -> StorageResult<Template> {
        let template = template.into_template(Uuid::new_v4());
        self.save(&template).await?;
        Ok(template)
    }

    async fn update(&self, id: Uuid, patch: TemplatePatch) -> StorageResult<Option<Template>> {
        let _guard = self.lock.lock().await;
        let Some(existing) = self.templates().await?.into_iter().find(|t| t.id == id) else {
            return Ok(None);
        };
        let merged = patch.merged(&existing);
        self.save_locked(&merged).await?;
        Ok(Some(merged))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let _guard = self.lock.lock().await;
        let mut templates = self.templates().await?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Ok(false);
        }
        self.write_json(TEMPLATES_KEY, &templates).await?;

        let current: Option<Template> = self.read_json(CURRENT_TEMPLATE_KEY).await?;
        if current.is_some_and(|c| c.id == id) {
            self.remove(CURRENT_TEMPLATE_KEY).await?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DEFAULT_OWNER, contract};

    #[tokio::test]
    async fn test_local_library_contract() {
        let dir = tempfile::tempdir().unwrap();
        let library = LocalLibrary::open(dir.path()).await.unwrap();
        contract::exercise(&library).await;
    }

    #[tokio::test]
    async fn test_persists_across_reopen_and_tracks_current() {
        let dir = tempfile::tempdir().unwrap();
        let created = {
            let library = LocalLibrary::open(dir.path()).await.unwrap();
            library
                .create(DEFAULT_OWNER, NewTemplate::default())
                .await
                .unwrap()
        };

        let library = LocalLibrary::open(dir.path()).await.unwrap();
        assert_eq!(library.list(DEFAULT_OWNER).await.unwrap(), vec![created.clone()]);
        assert_eq!(library.current().await.unwrap(), Some(created.clone()));

        assert!(library.delete(created.id).await.unwrap());
        assert_eq!(library.current().await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_update_racing_delete_never_restores() {
        let dir = tempfile::tempdir().unwrap();
        let library = std::sync::Arc::new(LocalLibrary::open(dir.path()).await.unwrap());

        for _ in 0..50 {
            let created = library
                .create(DEFAULT_OWNER, NewTemplate::default())
                .await
                .unwrap();
            let patch = TemplatePatch {
                title: Some("Renamed".into()),
                ..Default::default()
            };

            let updater = tokio::spawn({
                let library = library.clone();
                async move { library.update(created.id, patch).await.unwrap() }
            });
            let deleter = tokio::spawn({
                let library = library.clone();
                async move { library.delete(created.id).await.unwrap() }
            });
            let (updated, deleted) = (updater.await.unwrap(), deleter.await.unwrap());

            assert!(deleted);
            if let Some(updated) = updated {
                assert_eq!(updated.title, "Renamed");
            }
            assert_eq!(library.get(created.id).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("template-editor-templates.json"), "{not json").unwrap();
        let library = LocalLibrary::open(dir.path()).await.unwrap();
        assert!(library.list(DEFAULT_OWNER).await.unwrap().is_empty());

        library.save(&Template::new()).await.unwrap();
        assert_eq!(library.list(DEFAULT_OWNER).await.unwrap().len(), 1);
    }
}
