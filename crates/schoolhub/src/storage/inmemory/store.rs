//! In-memory document store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use schoolhub_core::entity::EntityKind;
use schoolhub_core::storage::{document_id, Document, DocumentStore, Rule, StoreResult};

/// In-memory document store for development and tests.
///
/// Each collection is a `Vec` in insertion order, wrapped in
/// `Arc<RwLock<_>>` for thread-safe access. Data is not persisted and will
/// be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<EntityKind, Vec<Document>>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.collections
            .read()
            .await
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    /// Keeps a caller-supplied `id`, otherwise assigns a UUID v4. A duplicate
    /// id is rejected.
    async fn create_document(
        &self,
        kind: EntityKind,
        mut data: Document,
    ) -> StoreResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(kind).or_default();

        let id = match document_id(&data) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        if documents.iter().any(|d| document_id(d) == Some(id.as_str())) {
            tracing::debug!(collection = %kind, id = %id, "Rejected duplicate document id");
            return Ok(None);
        }

        data.insert("id".to_string(), Value::String(id));
        documents.push(data.clone());
        Ok(Some(data))
    }

    async fn get_all_documents(&self, kind: EntityKind) -> StoreResult<Option<Vec<Document>>> {
        let collections = self.collections.read().await;
        Ok(Some(collections.get(&kind).cloned().unwrap_or_default()))
    }

    async fn get_document(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&kind)
            .and_then(|documents| documents.iter().find(|d| document_id(d) == Some(id)))
            .cloned())
    }

    async fn get_documents_by_rule(
        &self,
        kind: EntityKind,
        rule: &Rule,
    ) -> StoreResult<Option<Vec<Document>>> {
        let collections = self.collections.read().await;
        Ok(Some(
            collections
                .get(&kind)
                .map(|documents| {
                    documents
                        .iter()
                        .filter(|d| rule.matches_document(d))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
        ))
    }

    async fn update_document(
        &self,
        kind: EntityKind,
        id: &str,
        mut data: Document,
    ) -> StoreResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(slot) = collections
            .get_mut(&kind)
            .and_then(|documents| documents.iter_mut().find(|d| document_id(d) == Some(id)))
        else {
            return Ok(None);
        };

        data.insert("id".to_string(), Value::String(id.to_string()));
        *slot = data.clone();
        Ok(Some(data))
    }

    async fn delete_document(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(&kind) else {
            return Ok(None);
        };

        Ok(documents
            .iter()
            .position(|d| document_id(d) == Some(id))
            .map(|index| documents.remove(index)))
    }
}
