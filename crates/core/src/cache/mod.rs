//! Contract for the process-wide expiring key-value cache.
//!
//! Each entity collection is cached under one key (see [`collection_key`])
//! as a JSON-encoded sequence of populated records.

mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::collection_key;
pub use serialization::{deserialize_records, serialize_records, SerializationError};
pub use traits::Cache;
