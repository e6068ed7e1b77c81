//! In-memory listing cache with a freshness window and a retention window.
//!
//! Entries younger than `stale_after` are served. Older entries read as a
//! miss so the service refetches, but stay in memory until they pass
//! `evict_after`; every write sweeps evicted entries. Time comes from an
//! injected [`Clock`].
//!
//! The generation counter shares the lock with the entries, so a store and
//! an invalidation never interleave: a store that observed an older
//! generation is dropped.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use tracing::debug;

use crate::domain::ports::{CacheGeneration, ListingCache, ListingCacheError, ListingKey};
use crate::domain::{RestaurantId, RestaurantWithVisits};

/// Freshness and retention windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    stale_after: TimeDelta,
    evict_after: TimeDelta,
}

impl CachePolicy {
    /// Build a policy; `evict_after` is raised to `stale_after` when shorter.
    pub fn new(stale_after: TimeDelta, evict_after: TimeDelta) -> Self {
        Self {
            stale_after,
            evict_after: evict_after.max(stale_after),
        }
    }

    pub fn from_secs(stale_after: u64, evict_after: u64) -> Self {
        Self::new(seconds(stale_after), seconds(evict_after))
    }

    pub fn stale_after(&self) -> TimeDelta {
        self.stale_after
    }

    pub fn evict_after(&self) -> TimeDelta {
        self.evict_after
    }
}

impl Default for CachePolicy {
    /// Fresh for five minutes, retained for thirty.
    fn default() -> Self {
        Self::from_secs(300, 1800)
    }
}

fn seconds(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheState {
    generation: CacheGeneration,
    listings: HashMap<ListingKey, Entry<Vec<RestaurantWithVisits>>>,
    restaurants: HashMap<RestaurantId, Entry<RestaurantWithVisits>>,
}

/// Process-local [`ListingCache`] shared through `Arc`.
pub struct InMemoryListingCache {
    state: RwLock<CacheState>,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
}

impl InMemoryListingCache {
    pub fn new(policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            policy,
            clock,
        }
    }

    fn is_fresh(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - stored_at < self.policy.stale_after
    }

    fn is_retained(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - stored_at < self.policy.evict_after
    }

    fn poisoned() -> ListingCacheError {
        ListingCacheError::backend("listing cache lock poisoned")
    }

    /// Run `update` under the write lock after sweeping evicted entries.
    fn with_state<T>(
        &self,
        update: impl FnOnce(&mut CacheState, DateTime<Utc>) -> T,
    ) -> Result<T, ListingCacheError> {
        let now = self.clock.utc();
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        state
            .listings
            .retain(|_, entry| self.is_retained(entry.stored_at, now));
        state
            .restaurants
            .retain(|_, entry| self.is_retained(entry.stored_at, now));
        Ok(update(&mut state, now))
    }
}

#[async_trait]
impl ListingCache for InMemoryListingCache {
    async fn generation(&self) -> Result<CacheGeneration, ListingCacheError> {
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state.generation)
    }

    async fn listing(
        &self,
        key: &ListingKey,
    ) -> Result<Option<Vec<RestaurantWithVisits>>, ListingCacheError> {
        let now = self.clock.utc();
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .listings
            .get(key)
            .filter(|entry| self.is_fresh(entry.stored_at, now))
            .map(|entry| entry.value.clone()))
    }

    async fn store_listing(
        &self,
        key: ListingKey,
        listing: Vec<RestaurantWithVisits>,
        loaded_at: CacheGeneration,
    ) -> Result<(), ListingCacheError> {
        self.with_state(|state, now| {
            if state.generation != loaded_at {
                debug!(?key, "discarding listing loaded before an invalidation");
                return;
            }
            state.listings.insert(
                key,
                Entry {
                    value: listing,
                    stored_at: now,
                },
            );
        })
    }

    async fn restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantWithVisits>, ListingCacheError> {
        let now = self.clock.utc();
        let state = self.state.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .restaurants
            .get(id)
            .filter(|entry| self.is_fresh(entry.stored_at, now))
            .map(|entry| entry.value.clone()))
    }

    async fn store_restaurant(
        &self,
        entry: RestaurantWithVisits,
        loaded_at: CacheGeneration,
    ) -> Result<(), ListingCacheError> {
        self.with_state(|state, now| {
            if state.generation != loaded_at {
                debug!(
                    restaurant_id = %entry.id(),
                    "discarding restaurant loaded before an invalidation"
                );
                return;
            }
            state.restaurants.insert(
                entry.id(),
                Entry {
                    value: entry,
                    stored_at: now,
                },
            );
        })
    }

    async fn invalidate_listings(&self) -> Result<(), ListingCacheError> {
        self.with_state(|state, _| {
            state.generation = state.generation.next();
            state.listings.clear();
        })
    }

    async fn invalidate_restaurant(&self, id: &RestaurantId) -> Result<(), ListingCacheError> {
        self.with_state(|state, _| {
            state.generation = state.generation.next();
            state.restaurants.remove(id);
        })
    }
}
