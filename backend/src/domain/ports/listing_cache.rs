//! Port for caching listing results between reads.
//!
//! Adapters only hand back fresh entries. A stale entry reads as a miss so
//! the caller refetches; adapters decide how long stale entries are retained
//! before eviction.
//!
//! Every invalidation advances the cache generation. Callers read the
//! generation before loading from the store and pass it back when storing;
//! a store carrying an older generation is discarded, so a load that raced
//! a mutation never repopulates the cache with pre-mutation data.

use async_trait::async_trait;

use crate::domain::{Category, RestaurantId, RestaurantWithVisits, SortOption};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing cache adapters.
    pub enum ListingCacheError {
        /// Cache backend is unavailable or its state is poisoned.
        Backend { message: String } => "listing cache backend failure: {message}",
    }
}

/// Key for cached listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingKey {
    pub category: Option<Category>,
    pub sort: SortOption,
}

impl ListingKey {
    pub fn new(category: Option<Category>, sort: SortOption) -> Self {
        Self { category, sort }
    }
}

/// Invalidation counter observed before a store load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheGeneration(u64);

impl CacheGeneration {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Current invalidation generation.
    async fn generation(&self) -> Result<CacheGeneration, ListingCacheError>;

    /// Read a fresh cached listing.
    async fn listing(
        &self,
        key: &ListingKey,
    ) -> Result<Option<Vec<RestaurantWithVisits>>, ListingCacheError>;

    /// Store a listing under `key`, stamped with the current time.
    ///
    /// Discarded when an invalidation happened after `loaded_at` was read.
    async fn store_listing(
        &self,
        key: ListingKey,
        listing: Vec<RestaurantWithVisits>,
        loaded_at: CacheGeneration,
    ) -> Result<(), ListingCacheError>;

    /// Read a fresh cached single-restaurant result.
    async fn restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantWithVisits>, ListingCacheError>;

    /// Store a single-restaurant result, under the same generation rule as
    /// [`ListingCache::store_listing`].
    async fn store_restaurant(
        &self,
        entry: RestaurantWithVisits,
        loaded_at: CacheGeneration,
    ) -> Result<(), ListingCacheError>;

    /// Drop every cached listing.
    async fn invalidate_listings(&self) -> Result<(), ListingCacheError>;

    /// Drop the cached entry for one restaurant.
    async fn invalidate_restaurant(&self, id: &RestaurantId) -> Result<(), ListingCacheError>;
}

/// Cache that never retains anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpListingCache;

#[async_trait]
impl ListingCache for NoOpListingCache {
    async fn generation(&self) -> Result<CacheGeneration, ListingCacheError> {
        Ok(CacheGeneration::default())
    }

    async fn listing(
        &self,
        _key: &ListingKey,
    ) -> Result<Option<Vec<RestaurantWithVisits>>, ListingCacheError> {
        Ok(None)
    }

    async fn store_listing(
        &self,
        _key: ListingKey,
        _listing: Vec<RestaurantWithVisits>,
        _loaded_at: CacheGeneration,
    ) -> Result<(), ListingCacheError> {
        Ok(())
    }

    async fn restaurant(
        &self,
        _id: &RestaurantId,
    ) -> Result<Option<RestaurantWithVisits>, ListingCacheError> {
        Ok(None)
    }

    async fn store_restaurant(
        &self,
        _entry: RestaurantWithVisits,
        _loaded_at: CacheGeneration,
    ) -> Result<(), ListingCacheError> {
        Ok(())
    }

    async fn invalidate_listings(&self) -> Result<(), ListingCacheError> {
        Ok(())
    }

    async fn invalidate_restaurant(&self, _id: &RestaurantId) -> Result<(), ListingCacheError> {
        Ok(())
    }
}
