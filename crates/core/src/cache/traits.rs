use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
///
/// Implementations expire entries lazily: a read past the TTL reports a
/// miss, and nothing reloads the value on the caller's behalf.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache, replacing any prior entry.
    ///
    /// A zero TTL expires the entry immediately. `None` never expires.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key, regardless of TTL.
    async fn delete(&self, key: &str) -> Result<()>;
}
