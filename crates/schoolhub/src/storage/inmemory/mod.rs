//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of the `DocumentStore`
//! trait that keeps every collection in a `Vec` behind `Arc<RwLock<_>>`.
//! It backs the demo binary and the repository tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use schoolhub::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! seed_demo_school(&store).await?;
//! ```

mod store;

pub use store::InMemoryStore;
