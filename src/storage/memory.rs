//! In-memory template store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StorageResult, TemplateStore};
use crate::template::{NewTemplate, Template, TemplatePatch};

#[derive(Debug, Clone)]
struct Record {
    owner: String,
    template: Template,
}

/// Volatile store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn list(&self, owner: &str) -> StorageResult<Vec<Template>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.owner == owner)
            .map(|r| r.template.clone())
            .collect())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<Template>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.template.id == id)
            .map(|r| r.template.clone()))
    }

    async fn create(&self, owner: &str, template: NewTemplate) -> StorageResult<Template> {
        let template = template.into_template(Uuid::new_v4());
        self.records.write().await.push(Record {
            owner: owner.to_string(),
            template: template.clone(),
        });
        tracing::debug!(id = %template.id, owner, "created template");
        Ok(template)
    }

    async fn update(&self, id: Uuid, patch: TemplatePatch) -> StorageResult<Option<Template>> {
        let mut records = self.records.write().await;
        Ok(records
            .iter_mut()
            .find(|r| r.template.id == id)
            .map(|r| {
                patch.apply(&mut r.template);
                r.template.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.template.id != id);
        Ok(records.len() != before)
    }
}
