use crate::entity::EntityKind;

/// Returns the cache key for an entity collection.
///
/// Keys double as collection names and must be distinct across kinds,
/// since every repository shares one cache.
pub fn collection_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::School => "schools",
        EntityKind::User => "users",
        EntityKind::SetupAccount => "setup_accounts",
        EntityKind::Class => "classes",
        EntityKind::Subject => "subjects",
        EntityKind::Course => "courses",
        EntityKind::Grade => "grades",
        EntityKind::Blackboard => "blackboards",
        EntityKind::Club => "clubs",
        EntityKind::Event => "events",
        EntityKind::EventTicket => "event_tickets",
        EntityKind::Chat => "chats",
        EntityKind::Message => "messages",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_collection_keys() {
        assert_eq!(collection_key(EntityKind::User), "users");
        assert_eq!(collection_key(EntityKind::Club), "clubs");
        assert_eq!(collection_key(EntityKind::EventTicket), "event_tickets");
    }

    #[test]
    fn test_collection_keys_are_unique() {
        let keys: HashSet<&str> = EntityKind::ALL.into_iter().map(collection_key).collect();
        assert_eq!(keys.len(), EntityKind::ALL.len());
    }
}
