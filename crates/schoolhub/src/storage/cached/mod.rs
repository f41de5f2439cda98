//! Cached repository decorator.
//!
//! This module provides the generic repository that puts the expiring cache
//! in front of a document store. It implements a write-then-patch pattern:
//!
//! - **Reads**: Serve the cached collection, on miss reload it from the store
//!   and populate the cache
//! - **Writes**: Persist to the store, patch the cached collection, verify
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let cache = Arc::new(MemoryCache::new(1_000));
//!
//! let users: CachedRepository<User, _, _> =
//!     CachedRepository::new(store, cache, Duration::from_millis(180_000));
//! let ada = users.create(User::new("Ada")).await?;
//! ```

mod repository;

pub use repository::CachedRepository;
