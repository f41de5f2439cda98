//! Per-entity repository registry.
//!
//! Bundles one cached repository per entity kind. Every repository shares
//! the same store and the same cache, which is why their cache keys must be
//! distinct.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use schoolhub_core::cache::{collection_key, Cache};
use schoolhub_core::entity::{
    Blackboard, Chat, Class, Club, Course, Entity, EntityKind, Event, EventTicket, Grade, Message,
    School, SetupAccount, Subject, User,
};
use schoolhub_core::storage::{DocumentStore, EntityRepository, StoreError};

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::mock_data::seed_demo_school;
use crate::storage::{CachedRepository, InMemoryStore};

/// One repository per entity kind, sharing a store and a cache.
#[derive(Clone)]
pub struct Repositories {
    pub schools: Arc<dyn EntityRepository<School>>,
    pub users: Arc<dyn EntityRepository<User>>,
    pub setup_accounts: Arc<dyn EntityRepository<SetupAccount>>,
    pub classes: Arc<dyn EntityRepository<Class>>,
    pub subjects: Arc<dyn EntityRepository<Subject>>,
    pub courses: Arc<dyn EntityRepository<Course>>,
    pub grades: Arc<dyn EntityRepository<Grade>>,
    pub blackboards: Arc<dyn EntityRepository<Blackboard>>,
    pub clubs: Arc<dyn EntityRepository<Club>>,
    pub events: Arc<dyn EntityRepository<Event>>,
    pub event_tickets: Arc<dyn EntityRepository<EventTicket>>,
    pub chats: Arc<dyn EntityRepository<Chat>>,
    pub messages: Arc<dyn EntityRepository<Message>>,
}

impl Repositories {
    /// Creates the registry over a shared store and cache, using the TTL
    /// configured for each collection.
    ///
    /// # Panics
    ///
    /// Panics if two entity kinds share a cache key.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn Cache>, config: &Config) -> Self {
        assert!(
            cache_keys_are_distinct(),
            "every entity kind needs its own cache key"
        );

        Self {
            schools: repository::<School>(&store, &cache, config),
            users: repository::<User>(&store, &cache, config),
            setup_accounts: repository::<SetupAccount>(&store, &cache, config),
            classes: repository::<Class>(&store, &cache, config),
            subjects: repository::<Subject>(&store, &cache, config),
            courses: repository::<Course>(&store, &cache, config),
            grades: repository::<Grade>(&store, &cache, config),
            blackboards: repository::<Blackboard>(&store, &cache, config),
            clubs: repository::<Club>(&store, &cache, config),
            events: repository::<Event>(&store, &cache, config),
            event_tickets: repository::<EventTicket>(&store, &cache, config),
            chats: repository::<Chat>(&store, &cache, config),
            messages: repository::<Message>(&store, &cache, config),
        }
    }

    /// Creates a registry over an in-memory store seeded with the demo
    /// school and an in-memory cache.
    pub async fn with_demo_data(config: &Config) -> Result<Self, StoreError> {
        let store = Arc::new(InMemoryStore::new());
        seed_demo_school(store.as_ref()).await?;
        let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

        tracing::debug!(
            max_entries = config.cache_max_entries,
            ttl_ms = config.cache_ttl_ms,
            "Seeded demo school"
        );
        Ok(Self::new(store, cache, config))
    }

    /// Returns the populated records of one collection as JSON.
    pub async fn collection(&self, kind: EntityKind) -> anyhow::Result<Vec<Value>> {
        match kind {
            EntityKind::School => to_json(self.schools.get_all().await?),
            EntityKind::User => to_json(self.users.get_all().await?),
            EntityKind::SetupAccount => to_json(self.setup_accounts.get_all().await?),
            EntityKind::Class => to_json(self.classes.get_all().await?),
            EntityKind::Subject => to_json(self.subjects.get_all().await?),
            EntityKind::Course => to_json(self.courses.get_all().await?),
            EntityKind::Grade => to_json(self.grades.get_all().await?),
            EntityKind::Blackboard => to_json(self.blackboards.get_all().await?),
            EntityKind::Club => to_json(self.clubs.get_all().await?),
            EntityKind::Event => to_json(self.events.get_all().await?),
            EntityKind::EventTicket => to_json(self.event_tickets.get_all().await?),
            EntityKind::Chat => to_json(self.chats.get_all().await?),
            EntityKind::Message => to_json(self.messages.get_all().await?),
        }
    }
}

fn repository<E: Entity>(
    store: &Arc<dyn DocumentStore>,
    cache: &Arc<dyn Cache>,
    config: &Config,
) -> Arc<dyn EntityRepository<E>> {
    Arc::new(CachedRepository::<E, dyn DocumentStore, dyn Cache>::new(
        store.clone(),
        cache.clone(),
        config.ttl_for(E::KIND),
    ))
}

fn cache_keys_are_distinct() -> bool {
    let keys: HashSet<&str> = EntityKind::ALL.into_iter().map(collection_key).collect();
    keys.len() == EntityKind::ALL.len()
}

fn to_json<E: Serialize>(records: Vec<E>) -> anyhow::Result<Vec<Value>> {
    records
        .iter()
        .map(|record| serde_json::to_value(record).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use schoolhub_core::storage::{to_document, Rule};

    #[test]
    fn test_cache_keys_are_distinct() {
        assert!(cache_keys_are_distinct());
    }

    #[tokio::test]
    async fn test_with_demo_data_loads_every_collection() {
        let repos = Repositories::with_demo_data(&Config::default())
            .await
            .unwrap();

        for kind in EntityKind::ALL {
            let records = repos.collection(kind).await.unwrap();
            assert!(!records.is_empty(), "{kind} collection is empty");
        }
    }

    #[tokio::test]
    async fn test_repositories_share_one_cache() {
        let store = Arc::new(InMemoryStore::new());
        seed_demo_school(store.as_ref()).await.unwrap();
        let cache = Arc::new(MemoryCache::new(100));
        let repos = Repositories::new(store, cache.clone(), &Config::default());

        repos.users.get_all().await.unwrap();
        repos.clubs.get_all().await.unwrap();

        assert!(cache.get("users").await.unwrap().is_some());
        assert!(cache.get("clubs").await.unwrap().is_some());
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_mutation_is_visible_through_other_collections_after_reload() {
        let repos = Repositories::with_demo_data(&Config::default())
            .await
            .unwrap();

        let club = repos
            .clubs
            .get_all_by_rule(&Rule::new().field("name", "Chess Club"))
            .await
            .unwrap()
            .remove(0);
        let club_id = club.id.clone().unwrap();

        let mut renamed = repos.users.get_by_id("u-ada").await.unwrap();
        renamed.first_name = "Augusta".to_string();
        repos.users.update("u-ada", renamed).await.unwrap();

        // The clubs snapshot still holds the old nested user until reloaded
        let cached = repos.clubs.get_by_id(&club_id).await.unwrap();
        let leader = cached.leaders[0].record().unwrap();
        assert_eq!(leader.first_name, "Ada");

        repos.clubs.invalidate().await;
        let reloaded = repos.clubs.get_by_id(&club_id).await.unwrap();
        assert_eq!(reloaded.leaders[0].record().unwrap().first_name, "Augusta");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_comes_from_config() {
        let config = Config::from_lookup(|name| match name {
            "CACHE_TTL_MS" => Some("1000".to_string()),
            "CACHE_TTL_USERS_MS" => Some("5000".to_string()),
            _ => None,
        });
        let store = Arc::new(InMemoryStore::new());
        seed_demo_school(store.as_ref()).await.unwrap();
        let cache = Arc::new(MemoryCache::new(100));
        let repos = Repositories::new(store.clone(), cache, &config);

        let users = repos.users.get_all().await.unwrap().len();
        let subjects = repos.subjects.get_all().await.unwrap().len();

        // Written past the repositories, so only a reload can reveal them
        let eve = to_document(&User::new("Eve")).unwrap();
        store.create_document(EntityKind::User, eve).await.unwrap().unwrap();
        let latin = to_document(&Subject::new("Latin")).unwrap();
        store.create_document(EntityKind::Subject, latin).await.unwrap().unwrap();

        tokio::time::advance(Duration::from_millis(999)).await;
        assert_eq!(repos.subjects.get_all().await.unwrap().len(), subjects);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(repos.subjects.get_all().await.unwrap().len(), subjects + 1);
        assert_eq!(repos.users.get_all().await.unwrap().len(), users);

        tokio::time::advance(Duration::from_millis(4_000)).await;
        assert_eq!(repos.users.get_all().await.unwrap().len(), users + 1);
    }
}
