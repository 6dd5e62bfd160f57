use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::backend_api::ApiError;

pub mod invalidation;

pub use invalidation::{AdminMutation, KeySelector};

/// Identifies one cached response: the resource name plus the canonical
/// serialization of the request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: &'static str,
    pub params: String,
}

impl CacheKey {
    pub fn list<P: Serialize>(resource: &'static str, params: &P) -> Self {
        let params = serde_json::to_string(params).unwrap_or_default();
        Self { resource, params }
    }

    pub fn entity(resource: &'static str, id: impl Display) -> Self {
        Self {
            resource,
            params: id.to_string(),
        }
    }

    pub fn bare(resource: &'static str) -> Self {
        Self {
            resource,
            params: String::new(),
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.resource, self.params)
    }
}

struct CacheEntry {
    value: serde_json::Value,
    fetched_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Bumped on invalidation so an in-flight fetch that was superseded can
    /// be recognized and its result dropped instead of cached.
    generations: HashMap<CacheKey, u64>,
}

/// Response cache shared by every use case. Reads are cache-first within the
/// staleness window; a miss fetches with exactly one retry. Mutations never
/// write into the cache, they only invalidate keys through the explicit
/// [`AdminMutation`] table.
pub struct QueryCache {
    state: RwLock<CacheState>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            ttl,
        }
    }

    /// Returns the cached value for `key` if it is still fresh.
    pub fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let state = self.state.read().ok()?;
        let entry = state.entries.get(key)?;
        if entry.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    fn generation(&self, key: &CacheKey) -> u64 {
        match self.state.write() {
            Ok(mut state) => *state.generations.entry(key.clone()).or_insert(0),
            Err(_) => 0,
        }
    }

    /// Stores the fetched value unless the key was invalidated while the
    /// fetch was in flight.
    fn store_if_current(&self, key: &CacheKey, generation: u64, value: serde_json::Value) -> bool {
        let Ok(mut state) = self.state.write() else {
            return false;
        };
        let current = state.generations.get(key).copied().unwrap_or(0);
        if current != generation {
            return false;
        }
        state.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
        true
    }

    /// Cache-first read. On a stale or missing entry the `fetch` closure is
    /// invoked, with one retry on failure; there is no request cancellation,
    /// a superseded response is simply not cached.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.lookup::<T>(&key) {
            debug!(%key, "cache: fresh hit");
            return Ok(hit);
        }

        let generation = self.generation(&key);

        let value = match fetch().await {
            Ok(value) => value,
            Err(first_err) => {
                warn!(%key, error = %first_err, "cache: fetch failed, retrying once");
                fetch().await?
            }
        };

        match serde_json::to_value(&value) {
            Ok(json) => {
                if !self.store_if_current(&key, generation, json) {
                    debug!(%key, "cache: fetch superseded by invalidation, result not cached");
                }
            }
            Err(err) => {
                warn!(%key, error = %err, "cache: response not serializable, skipping store");
            }
        }

        Ok(value)
    }

    /// Applies the invalidation table entry for one confirmed mutation.
    pub fn invalidate(&self, mutation: &AdminMutation) {
        for selector in mutation.invalidated_keys() {
            self.evict(&selector);
        }
    }

    /// Drops every entry matched by the selector and bumps its generation.
    pub fn evict(&self, selector: &KeySelector) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        match selector {
            KeySelector::Resource(resource) => {
                state.entries.retain(|key, _| key.resource != *resource);
                for (key, generation) in state.generations.iter_mut() {
                    if key.resource == *resource {
                        *generation += 1;
                    }
                }
                debug!(resource, "cache: resource keys invalidated");
            }
            KeySelector::Entity(resource, id) => {
                let key = CacheKey {
                    resource,
                    params: id.clone(),
                };
                state.entries.remove(&key);
                *state.generations.entry(key).or_insert(0) += 1;
                debug!(resource, id = %id, "cache: entity key invalidated");
            }
        }
    }
}

#[cfg(test)]
mod tests;
