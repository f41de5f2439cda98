use std::{collections::HashMap, env, time::Duration};

use schoolhub_core::cache::collection_key;
use schoolhub_core::entity::EntityKind;

use crate::cache::MIN_CACHE_ENTRIES;

/// Default cache TTL for every collection, in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 180_000;

/// Default LRU capacity of the in-memory cache.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cache TTL in milliseconds for collections without an override
    pub cache_ttl_ms: u64,
    /// Per-collection TTL overrides in milliseconds
    pub cache_ttl_overrides: HashMap<EntityKind, u64>,
    /// Maximum number of cache entries
    pub cache_max_entries: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_MS` - Cache TTL in milliseconds (default: 180,000)
    /// - `CACHE_TTL_<KEY>_MS` - TTL override for one collection, e.g. `CACHE_TTL_USERS_MS`
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1,000, at least one
    ///   per collection)
    ///
    /// Values that are not positive integers fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let positive = |name: &str| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        let cache_ttl_overrides = EntityKind::ALL
            .into_iter()
            .filter_map(|kind| positive(ttl_override_var(kind).as_str()).map(|ms| (kind, ms)))
            .collect();

        Self {
            cache_ttl_ms: positive("CACHE_TTL_MS").unwrap_or(DEFAULT_CACHE_TTL_MS),
            cache_ttl_overrides,
            cache_max_entries: positive("CACHE_MAX_ENTRIES")
                .and_then(|v| usize::try_from(v).ok())
                .map_or(DEFAULT_CACHE_MAX_ENTRIES, |v| v.max(MIN_CACHE_ENTRIES)),
        }
    }

    /// Replaces the default TTL. Zero is ignored.
    pub fn with_cache_ttl_ms(mut self, ttl_ms: u64) -> Self {
        if ttl_ms > 0 {
            self.cache_ttl_ms = ttl_ms;
        }
        self
    }

    /// Get the default cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Get the cache TTL of one collection.
    pub fn ttl_for(&self, kind: EntityKind) -> Duration {
        self.cache_ttl_overrides
            .get(&kind)
            .map_or_else(|| self.cache_ttl(), |ms| Duration::from_millis(*ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            cache_ttl_overrides: HashMap::new(),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

fn ttl_override_var(kind: EntityKind) -> String {
    format!("CACHE_TTL_{}_MS", collection_key(kind).to_uppercase())
}
