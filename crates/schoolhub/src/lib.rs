//! Write-through cached data access for the school platform.
//!
//! Concrete implementations of the traits in `schoolhub_core`: the in-memory
//! expiring cache, the in-memory document store and the generic cached
//! repository, plus the per-entity registry that wires them together.

pub mod cache;
pub mod config;
pub mod mock_data;
pub mod state;
pub mod storage;
