use std::fmt;

use serde::{Deserialize, Serialize};

/// The entity types managed by the data-access layer.
///
/// Each kind maps to one document store collection and one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    School,
    User,
    SetupAccount,
    Class,
    Subject,
    Course,
    Grade,
    Blackboard,
    Club,
    Event,
    EventTicket,
    Chat,
    Message,
}

impl EntityKind {
    /// Every entity kind, in declaration order.
    pub const ALL: [EntityKind; 13] = [
        EntityKind::School,
        EntityKind::User,
        EntityKind::SetupAccount,
        EntityKind::Class,
        EntityKind::Subject,
        EntityKind::Course,
        EntityKind::Grade,
        EntityKind::Blackboard,
        EntityKind::Club,
        EntityKind::Event,
        EntityKind::EventTicket,
        EntityKind::Chat,
        EntityKind::Message,
    ];

    /// Returns the type name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::School => "School",
            EntityKind::User => "User",
            EntityKind::SetupAccount => "SetupAccount",
            EntityKind::Class => "Class",
            EntityKind::Subject => "Subject",
            EntityKind::Course => "Course",
            EntityKind::Grade => "Grade",
            EntityKind::Blackboard => "Blackboard",
            EntityKind::Club => "Club",
            EntityKind::Event => "Event",
            EntityKind::EventTicket => "EventTicket",
            EntityKind::Chat => "Chat",
            EntityKind::Message => "Message",
        }
    }

    /// Looks up a kind by its collection name (e.g. `"users"`).
    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| crate::cache::collection_key(*kind) == collection)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
