use serde::{de::DeserializeOwned, Serialize};

use super::error::ValidationError;
use super::kind::EntityKind;
use super::reference::RelationPath;

/// A record type managed by a cached repository.
///
/// Implementors declare their kind and the relation fields that are joined
/// when the record is loaded.
pub trait Entity: Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The entity kind, which selects the collection and cache key.
    const KIND: EntityKind;

    /// Relation fields populated on every load.
    const RELATIONS: &'static [RelationPath];

    /// The store-assigned id, `None` before creation.
    fn id(&self) -> Option<&str>;

    /// Checks field domains before the record is written.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
