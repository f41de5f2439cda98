//! Cache backend implementations.
//!
//! This module provides concrete implementations of the cache trait
//! defined in `schoolhub_core::cache`.
//!
//! - `memory`: In-memory LRU cache with lazy TTL expiry using tokio
//!   synchronization primitives

pub mod memory;

pub use memory::{MemoryCache, MIN_CACHE_ENTRIES};
