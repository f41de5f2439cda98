//! Generic cached repository.
//!
//! Wraps a `DocumentStore` with a write-then-patch cache for one entity type.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tokio::sync::Mutex;

use schoolhub_core::cache::{
    collection_key, deserialize_records, serialize_records, Cache, CacheError,
};
use schoolhub_core::entity::Entity;
use schoolhub_core::population::{dehydrate, populate};
use schoolhub_core::storage::{
    document_id, filter_by_rule, from_document, to_document, Document, DocumentStore,
    EntityRepository, RepositoryError, Result, Rule,
};

/// Cached repository for entity type `E`.
///
/// The whole collection is cached under one key as a sequence of populated
/// records:
/// - **Reads**: Serve the cached sequence; on a miss reload the collection
///   from the store, populate every record and cache the result
/// - **Writes**: Persist to the store, populate the result, patch the cached
///   sequence, then read the cache back to verify the patch
///
/// Mutations of one repository are serialized; reads never wait on them.
///
/// # Type Parameters
///
/// * `E` - The entity type
/// * `S` - The document store implementation
/// * `C` - The cache implementation
pub struct CachedRepository<E, S: ?Sized, C: ?Sized> {
    store: Arc<S>,
    cache: Arc<C>,
    ttl: Duration,
    key: &'static str,
    mutation: Mutex<()>,
    entity: PhantomData<fn() -> E>,
}

impl<E, S, C> CachedRepository<E, S, C>
where
    E: Entity,
    S: DocumentStore + ?Sized + 'static,
    C: Cache + ?Sized + 'static,
{
    /// Creates a new cached repository.
    ///
    /// # Arguments
    ///
    /// * `store` - The authoritative document store
    /// * `cache` - The cache shared by every repository
    /// * `ttl` - Time-to-live of the cached collection
    pub fn new(store: Arc<S>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            store,
            cache,
            ttl,
            key: collection_key(E::KIND),
            mutation: Mutex::new(()),
            entity: PhantomData,
        }
    }

    /// The cache key of the collection.
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Confirms the cached collection holds `expected` under `id`.
    ///
    /// `expected` is compared in the form it takes after a trip through the
    /// cache encoding, so values the encoding cannot reproduce bit for bit
    /// (floats in free-form details) do not count as divergence.
    pub async fn verify_present(&self, id: &str, expected: &E) -> Result<()> {
        let expected = self.encoded_form(id, expected)?;
        let records = self
            .read_back(id)
            .await?
            .ok_or_else(|| self.diverged(id, "cached collection is missing"))?;

        match records.iter().find(|record| record.id() == Some(id)) {
            Some(record) if *record == expected => Ok(()),
            Some(_) => Err(self.diverged(id, "cached record differs from the stored record")),
            None => Err(self.diverged(id, "record is missing from the cached collection")),
        }
    }

    /// Confirms no cached record has `id`.
    pub async fn verify_absent(&self, id: &str) -> Result<()> {
        let Some(records) = self.read_back(id).await? else {
            return Ok(());
        };

        if records.iter().any(|record| record.id() == Some(id)) {
            return Err(self.diverged(id, "deleted record is still cached"));
        }
        Ok(())
    }

    /// Reads the cached collection, treating failures as a miss.
    async fn cached(&self) -> Option<Vec<E>> {
        match self.cache.get(self.key).await {
            Ok(Some(bytes)) => match deserialize_records(&bytes) {
                Ok(records) => {
                    tracing::trace!(collection = self.key, "Cache hit");
                    Some(records)
                }
                Err(err) => {
                    tracing::warn!(
                        collection = self.key,
                        error = %err,
                        "Cache deserialization failed"
                    );
                    None
                }
            },
            Ok(None) => {
                tracing::trace!(collection = self.key, "Cache miss");
                None
            }
            Err(err) => {
                tracing::warn!(collection = self.key, error = %err, "Cache read failed");
                None
            }
        }
    }

    /// Reads the cached collection for verification, without fallback.
    async fn read_back(&self, id: &str) -> Result<Option<Vec<E>>> {
        let Some(bytes) = self
            .cache
            .get(self.key)
            .await
            .map_err(|e| self.diverged(id, e.to_string()))?
        else {
            return Ok(None);
        };

        deserialize_records(&bytes)
            .map(Some)
            .map_err(|e| self.diverged(id, e.to_string()))
    }

    /// Returns `record` as it reads back after a cache write.
    fn encoded_form(&self, id: &str, record: &E) -> Result<E> {
        serialize_records(std::slice::from_ref(record))
            .and_then(|bytes| deserialize_records::<E>(&bytes))
            .map_err(|e| self.diverged(id, e.to_string()))?
            .pop()
            .ok_or_else(|| self.diverged(id, "record did not survive cache encoding"))
    }

    async fn put(&self, records: &[E]) -> std::result::Result<(), CacheError> {
        let bytes = serialize_records(records)?;
        self.cache.set(self.key, &bytes, Some(self.ttl)).await
    }

    /// Writes the patched collection back after a mutation.
    async fn patch(&self, id: &str, records: &[E]) -> Result<()> {
        self.put(records)
            .await
            .map_err(|e| self.diverged(id, e.to_string()))
    }

    /// Populates a raw store document into a typed record.
    async fn load(&self, document: Document) -> Result<E> {
        let populated = populate(self.store.as_ref(), document, E::RELATIONS)
            .await
            .map_err(|e| RepositoryError::database(E::KIND, e.to_string()))?;
        from_document(populated).map_err(|e| RepositoryError::database(E::KIND, e.to_string()))
    }

    /// Validates a record and converts it to its stored form, with
    /// relations reduced to ids.
    fn encode(&self, record: &E) -> Result<Document> {
        record
            .validate()
            .map_err(|e| RepositoryError::validation(E::KIND, e))?;
        let mut document =
            to_document(record).map_err(|e| RepositoryError::database(E::KIND, e.to_string()))?;
        dehydrate(&mut document, E::RELATIONS);
        Ok(document)
    }

    fn diverged(&self, id: &str, detail: impl Into<String>) -> RepositoryError {
        let err = RepositoryError::cache(E::KIND, id, detail);
        tracing::error!(collection = self.key, id = %id, error = %err, "Cache diverged from store");
        err
    }
}

/// Replaces the record with `id`, or appends it when absent.
fn upsert<E: Entity>(records: &mut Vec<E>, id: &str, record: E) {
    match records.iter_mut().find(|r| r.id() == Some(id)) {
        Some(slot) => *slot = record,
        None => records.push(record),
    }
}

#[async_trait]
impl<E, S, C> EntityRepository<E> for CachedRepository<E, S, C>
where
    E: Entity,
    S: DocumentStore + ?Sized + 'static,
    C: Cache + ?Sized + 'static,
{
    async fn get_all(&self) -> Result<Vec<E>> {
        match self.cached().await {
            Some(records) => Ok(records),
            None => self.reload().await,
        }
    }

    async fn reload(&self) -> Result<Vec<E>> {
        let documents = self
            .store
            .get_all_documents(E::KIND)
            .await
            .map_err(|e| RepositoryError::database(E::KIND, e.to_string()))?
            .ok_or_else(|| RepositoryError::database(E::KIND, "store returned no collection"))?;

        let records = try_join_all(documents.into_iter().map(|d| self.load(d))).await?;

        if let Err(err) = self.put(&records).await {
            tracing::warn!(collection = self.key, error = %err, "Failed to cache collection");
        }

        tracing::debug!(collection = self.key, count = records.len(), "Collection reloaded");
        Ok(records)
    }

    async fn get_by_id(&self, id: &str) -> Result<E> {
        self.get_all()
            .await?
            .into_iter()
            .find(|record| record.id() == Some(id))
            .ok_or_else(|| RepositoryError::not_found(E::KIND, id))
    }

    async fn get_all_by_rule(&self, rule: &Rule) -> Result<Vec<E>> {
        let records = self.get_all().await?;
        let matched = filter_by_rule(&records, rule);
        if matched.is_empty() {
            return Err(RepositoryError::not_found(E::KIND, rule.to_string()));
        }
        Ok(matched)
    }

    async fn create(&self, record: E) -> Result<E> {
        let document = self.encode(&record)?;
        let _guard = self.mutation.lock().await;

        // 1. Persist to storage
        let stored = self
            .store
            .create_document(E::KIND, document)
            .await
            .map_err(|e| RepositoryError::database(E::KIND, e.to_string()))?
            .ok_or_else(|| RepositoryError::database(E::KIND, "store rejected the new record"))?;
        let id = document_id(&stored)
            .map(str::to_string)
            .ok_or_else(|| RepositoryError::database(E::KIND, "store returned a record without id"))?;
        let created = self.load(stored).await?;

        // 2. Patch the cached collection
        let mut records = self.get_all().await?;
        upsert(&mut records, &id, created.clone());
        self.patch(&id, &records).await?;

        // 3. Verify
        self.verify_present(&id, &created).await?;

        tracing::debug!(collection = self.key, id = %id, count = records.len(), "Record created");
        Ok(created)
    }

    async fn update(&self, id: &str, record: E) -> Result<E> {
        let mut document = self.encode(&record)?;
        document.insert("id".to_string(), id.into());
        let _guard = self.mutation.lock().await;

        // 1. Persist to storage
        let stored = self
            .store
            .update_document(E::KIND, id, document)
            .await
            .map_err(|e| RepositoryError::database(E::KIND, e.to_string()))?
            .ok_or_else(|| {
                RepositoryError::database(E::KIND, format!("store rejected update of {id}"))
            })?;
        let updated = self.load(stored).await?;

        // 2. Patch the cached collection
        let mut records = self.get_all().await?;
        upsert(&mut records, id, updated.clone());
        self.patch(id, &records).await?;

        // 3. Verify
        self.verify_present(id, &updated).await?;

        tracing::debug!(collection = self.key, id = %id, "Record updated");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.mutation.lock().await;

        // 1. Persist deletion to storage
        self.store
            .delete_document(E::KIND, id)
            .await
            .map_err(|e| RepositoryError::database(E::KIND, e.to_string()))?
            .ok_or_else(|| {
                RepositoryError::database(E::KIND, format!("store deleted no record for {id}"))
            })?;

        // 2. Patch the cached collection
        let mut records = self.get_all().await?;
        records.retain(|record| record.id() != Some(id));
        self.patch(id, &records).await?;

        // 3. Verify
        self.verify_absent(id).await?;

        tracing::debug!(collection = self.key, id = %id, count = records.len(), "Record deleted");
        Ok(true)
    }

    async fn invalidate(&self) {
        if let Err(err) = self.cache.delete(self.key).await {
            tracing::warn!(collection = self.key, error = %err, "Failed to invalidate collection");
        }
    }
}
