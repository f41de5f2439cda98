//! Pure functions for serializing/deserializing record sequences to/from cache bytes.
//!
//! These functions use JSON serialization for cache storage, providing human-readable
//! cache values that are easy to debug and inspect.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a slice of records to JSON bytes.
///
/// # Arguments
/// * `records` - The records to serialize, in cache order
///
/// # Returns
/// JSON-encoded bytes representing the records array
pub fn serialize_records<E: Serialize>(records: &[E]) -> Result<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a vector of records.
///
/// # Arguments
/// * `bytes` - JSON-encoded bytes
///
/// # Returns
/// The deserialized records, in the order they were stored
pub fn deserialize_records<E: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<E>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
