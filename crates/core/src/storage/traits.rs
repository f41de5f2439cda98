use async_trait::async_trait;

use crate::entity::{Entity, EntityKind};

use super::rule::Rule;
use super::types::Document;
use super::{Result, StoreResult};

/// The authoritative document store, one collection per entity kind.
///
/// `Ok(None)` means the store answered but rejected the operation (nothing
/// created, no such document, nothing deleted). Repositories turn it into
/// a database failure.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document and returns it with its store-assigned id.
    async fn create_document(&self, kind: EntityKind, data: Document)
        -> StoreResult<Option<Document>>;

    /// Returns every document of a collection in store iteration order.
    async fn get_all_documents(&self, kind: EntityKind) -> StoreResult<Option<Vec<Document>>>;

    /// Gets a single document by id.
    async fn get_document(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>>;

    /// Returns the documents of a collection that match a rule.
    async fn get_documents_by_rule(
        &self,
        kind: EntityKind,
        rule: &Rule,
    ) -> StoreResult<Option<Vec<Document>>>;

    /// Replaces a document and returns the stored replacement.
    async fn update_document(
        &self,
        kind: EntityKind,
        id: &str,
        data: Document,
    ) -> StoreResult<Option<Document>>;

    /// Deletes a document and returns what was removed.
    async fn delete_document(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Document>>;
}

/// Cached data access for one entity type.
///
/// Reads are served from the cache when a valid snapshot exists. Mutations
/// write to the store first and then patch the cached collection.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Returns the cached collection, reloading it on a miss.
    async fn get_all(&self) -> Result<Vec<E>>;

    /// Reads the whole collection from the store, populates every record
    /// and replaces the cached snapshot.
    async fn reload(&self) -> Result<Vec<E>>;

    /// Gets a record by id.
    async fn get_by_id(&self, id: &str) -> Result<E>;

    /// Returns the records matching `rule`; an empty match is `NotFound`.
    async fn get_all_by_rule(&self, rule: &Rule) -> Result<Vec<E>>;

    /// Creates a record and returns it populated, with its new id.
    async fn create(&self, record: E) -> Result<E>;

    /// Replaces the record with `id` and returns the populated replacement.
    async fn update(&self, id: &str, record: E) -> Result<E>;

    /// Deletes the record with `id`.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Drops the cached collection so the next read reloads it.
    async fn invalidate(&self);
}
