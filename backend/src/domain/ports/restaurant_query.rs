//! Driving port for restaurant reads.
//!
//! HTTP handlers call this port for listings, single-restaurant lookups and
//! statistics without knowing whether results come from the cache or the
//! store.

use async_trait::async_trait;

use crate::domain::{Category, Error, ListingStats, RestaurantId, RestaurantWithVisits, SortOption};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantQuery: Send + Sync {
    /// Restaurants with at least one visit, in the requested order.
    async fn list_restaurants(
        &self,
        category: Option<Category>,
        sort: SortOption,
    ) -> Result<Vec<RestaurantWithVisits>, Error>;

    /// One restaurant with its visits; `None` when absent. Restaurants
    /// without visits are still returned.
    async fn get_restaurant(&self, id: &RestaurantId)
    -> Result<Option<RestaurantWithVisits>, Error>;

    /// Statistics over the full, unfiltered listing.
    async fn listing_stats(&self) -> Result<ListingStats, Error>;
}

/// Fixture query with nothing recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRestaurantQuery;

#[async_trait]
impl RestaurantQuery for FixtureRestaurantQuery {
    async fn list_restaurants(
        &self,
        _category: Option<Category>,
        _sort: SortOption,
    ) -> Result<Vec<RestaurantWithVisits>, Error> {
        Ok(Vec::new())
    }

    async fn get_restaurant(
        &self,
        _id: &RestaurantId,
    ) -> Result<Option<RestaurantWithVisits>, Error> {
        Ok(None)
    }

    async fn listing_stats(&self) -> Result<ListingStats, Error> {
        Ok(ListingStats::from_listing(&[]))
    }
}
