use serde::{Deserialize, Serialize};

use super::kind::EntityKind;
use super::traits::Entity;

/// A relation field value: a bare reference id or the joined record.
///
/// Stored documents always hold ids. After population the field holds the
/// full nested record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Record(Box<T>),
}

impl<T: Entity> Ref<T> {
    /// Returns the referenced id, whether or not the field is populated.
    pub fn id(&self) -> Option<&str> {
        match self {
            Ref::Id(id) => Some(id),
            Ref::Record(record) => record.id(),
        }
    }

    /// Returns the nested record if the field is populated.
    pub fn record(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Record(record) => Some(record),
        }
    }

    /// Returns true if the field holds a joined record rather than an id.
    pub fn is_populated(&self) -> bool {
        matches!(self, Ref::Record(_))
    }

    /// Returns true if this reference points at `id`.
    pub fn refers_to(&self, id: &str) -> bool {
        self.id() == Some(id)
    }
}

impl<T> From<&str> for Ref<T> {
    fn from(id: &str) -> Self {
        Ref::Id(id.to_string())
    }
}

impl<T> From<String> for Ref<T> {
    fn from(id: String) -> Self {
        Ref::Id(id)
    }
}

/// Static declaration of one relation field and how deep to join it.
///
/// `nested` lists the relations of the target record that are joined as
/// well. An empty `nested` joins the target record with its own relation
/// fields left as ids, which keeps cyclic graphs finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationPath {
    pub field: &'static str,
    pub target: EntityKind,
    pub nested: &'static [RelationPath],
}

impl RelationPath {
    pub const fn new(field: &'static str, target: EntityKind) -> Self {
        Self {
            field,
            target,
            nested: &[],
        }
    }

    pub const fn with_nested(mut self, nested: &'static [RelationPath]) -> Self {
        self.nested = nested;
        self
    }
}
