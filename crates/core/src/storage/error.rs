use thiserror::Error;

use crate::entity::{EntityKind, ValidationError};

/// Errors reported by a document store client (transport level).
///
/// A store that answers but rejects an operation returns `Ok(None)` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for document store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during repository operations.
///
/// Every variant names the entity type and the id or rule involved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The store rejected a read/write/delete or returned a malformed result.
    #[error("{entity_type} database failure: {detail}")]
    Database {
        entity_type: &'static str,
        detail: String,
    },
    /// A lookup by id or by rule matched nothing.
    #[error("{entity_type} not found: {lookup}")]
    NotFound {
        entity_type: &'static str,
        lookup: String,
    },
    /// The store write committed but the cache patch could not be verified.
    #[error("{entity_type} cache diverged from store for {id}: {detail}")]
    Cache {
        entity_type: &'static str,
        id: String,
        detail: String,
    },
    /// A field value is outside its allowed domain.
    #[error("{entity_type} failed validation: {source}")]
    Validation {
        entity_type: &'static str,
        #[source]
        source: ValidationError,
    },
}

impl RepositoryError {
    pub fn database(kind: EntityKind, detail: impl Into<String>) -> Self {
        Self::Database {
            entity_type: kind.name(),
            detail: detail.into(),
        }
    }

    pub fn not_found(kind: EntityKind, lookup: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: kind.name(),
            lookup: lookup.into(),
        }
    }

    pub fn cache(kind: EntityKind, id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Cache {
            entity_type: kind.name(),
            id: id.into(),
            detail: detail.into(),
        }
    }

    pub fn validation(kind: EntityKind, source: ValidationError) -> Self {
        Self::Validation {
            entity_type: kind.name(),
            source,
        }
    }

    /// The entity type name carried by every variant.
    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::Database { entity_type, .. }
            | Self::NotFound { entity_type, .. }
            | Self::Cache { entity_type, .. }
            | Self::Validation { entity_type, .. } => entity_type,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::QueryFailed("bad filter".to_string()).to_string(),
            "Query failed: bad filter"
        );
        assert_eq!(
            StoreError::Serialization("not an object".to_string()).to_string(),
            "Serialization error: not an object"
        );
    }

    #[test]
    fn test_repository_error_database_display() {
        let error = RepositoryError::database(EntityKind::User, "delete matched no document u4");
        assert_eq!(
            error.to_string(),
            "User database failure: delete matched no document u4"
        );
    }

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::not_found(EntityKind::Club, "c-123");
        assert_eq!(error.to_string(), "Club not found: c-123");
    }

    #[test]
    fn test_repository_error_cache_display() {
        let error = RepositoryError::cache(EntityKind::Event, "e1", "record missing after put");
        assert_eq!(
            error.to_string(),
            "Event cache diverged from store for e1: record missing after put"
        );
    }

    #[test]
    fn test_repository_error_validation_display() {
        let error = RepositoryError::validation(
            EntityKind::User,
            ValidationError::Empty {
                field: "firstName",
            },
        );
        assert_eq!(
            error.to_string(),
            "User failed validation: firstName cannot be empty"
        );
    }

    #[test]
    fn test_entity_type_accessor() {
        let error = RepositoryError::not_found(EntityKind::Grade, "g1");
        assert_eq!(error.entity_type(), "Grade");
    }
}
