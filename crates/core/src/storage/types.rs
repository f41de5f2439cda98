use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::{StoreError, StoreResult};

/// A raw store record: a JSON object with an `id` field once stored.
pub type Document = Map<String, Value>;

/// Returns the id of a stored document.
pub fn document_id(document: &Document) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

/// Converts a record into a document.
pub fn to_document<T: Serialize>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(StoreError::Serialization(format!(
            "expected a JSON object, found {other}"
        ))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

/// Converts a document into a typed record.
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}
