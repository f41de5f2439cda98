//! Storage backend implementations.
//!
//! This module provides the concrete document store and the cached
//! repository built on the traits defined in `schoolhub_core::storage`.

pub mod cached;
pub mod inmemory;

pub use cached::CachedRepository;
pub use inmemory::InMemoryStore;
