//! Restaurant read and mutation services.
//!
//! Reads go through the listing cache first and fall back to the
//! repositories, assembling listings in memory. A load only repopulates the
//! cache when no invalidation happened since it started. Mutations check the
//! caller's capability before any write and invalidate the cache afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CacheGeneration, ListingCache, ListingCacheError, ListingKey, RestaurantCommand, RestaurantQuery,
    RestaurantRepository, RestaurantRepositoryError, VisitRepository, VisitRepositoryError,
};
use crate::domain::{
    Caller, Category, Error, ListingStats, NewRestaurant, Restaurant, RestaurantId,
    RestaurantWithVisits, SortOption, assemble_listing,
};

/// Implements [`RestaurantQuery`] and [`RestaurantCommand`].
#[derive(Clone)]
pub struct RestaurantService<R, V, C> {
    restaurants: Arc<R>,
    visits: Arc<V>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, V, C> RestaurantService<R, V, C> {
    pub fn new(
        restaurants: Arc<R>,
        visits: Arc<V>,
        cache: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            restaurants,
            visits,
            cache,
            clock,
        }
    }
}

pub(crate) fn map_restaurant_error(error: RestaurantRepositoryError) -> Error {
    match error {
        RestaurantRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("restaurant repository unavailable: {message}"))
        }
        RestaurantRepositoryError::Query { message } => {
            Error::internal(format!("restaurant repository error: {message}"))
        }
    }
}

pub(crate) fn map_visit_error(error: VisitRepositoryError) -> Error {
    match error {
        VisitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("visit repository unavailable: {message}"))
        }
        VisitRepositoryError::Query { message } => {
            Error::internal(format!("visit repository error: {message}"))
        }
    }
}

/// Cache failures never fail a request; they only cost a refetch.
pub(crate) fn log_cache_error(operation: &'static str, error: &ListingCacheError) {
    warn!(operation, error = %error, "listing cache operation failed");
}

/// Drop cached listings and the entry for `id` after a successful mutation.
pub(crate) async fn invalidate_after_mutation<C: ListingCache + ?Sized>(
    cache: &C,
    id: &RestaurantId,
) {
    if let Err(error) = cache.invalidate_listings().await {
        log_cache_error("invalidate_listings", &error);
    }
    if let Err(error) = cache.invalidate_restaurant(id).await {
        log_cache_error("invalidate_restaurant", &error);
    }
}

impl<R, V, C> RestaurantService<R, V, C>
where
    R: RestaurantRepository,
    V: VisitRepository,
    C: ListingCache,
{
    /// Generation to stamp on the next store, or `None` to skip storing.
    async fn cache_generation(&self) -> Option<CacheGeneration> {
        match self.cache.generation().await {
            Ok(generation) => Some(generation),
            Err(error) => {
                log_cache_error("generation", &error);
                None
            }
        }
    }

    async fn load_listing(
        &self,
        category: Option<Category>,
        sort: SortOption,
    ) -> Result<Vec<RestaurantWithVisits>, Error> {
        let restaurants = self
            .restaurants
            .list(category)
            .await
            .map_err(map_restaurant_error)?;
        if restaurants.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<RestaurantId> = restaurants.iter().map(|restaurant| restaurant.id).collect();
        let visits = self
            .visits
            .list_summaries_for(&ids)
            .await
            .map_err(map_visit_error)?;
        Ok(assemble_listing(restaurants, visits, sort))
    }

    async fn load_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantWithVisits>, Error> {
        let Some(restaurant) = self
            .restaurants
            .find_by_id(id)
            .await
            .map_err(map_restaurant_error)?
        else {
            return Ok(None);
        };
        let visits = self
            .visits
            .list_summaries_for(std::slice::from_ref(id))
            .await
            .map_err(map_visit_error)?;
        Ok(Some(RestaurantWithVisits::new(restaurant, visits)))
    }
}

#[async_trait]
impl<R, V, C> RestaurantQuery for RestaurantService<R, V, C>
where
    R: RestaurantRepository,
    V: VisitRepository,
    C: ListingCache,
{
    async fn list_restaurants(
        &self,
        category: Option<Category>,
        sort: SortOption,
    ) -> Result<Vec<RestaurantWithVisits>, Error> {
        let key = ListingKey::new(category, sort);
        match self.cache.listing(&key).await {
            Ok(Some(listing)) => {
                debug!(?category, ?sort, "serving cached listing");
                return Ok(listing);
            }
            Ok(None) => {}
            Err(error) => log_cache_error("listing", &error),
        }

        let loaded_at = self.cache_generation().await;
        let listing = self.load_listing(category, sort).await?;
        if let Some(loaded_at) = loaded_at {
            if let Err(error) = self
                .cache
                .store_listing(key, listing.clone(), loaded_at)
                .await
            {
                log_cache_error("store_listing", &error);
            }
        }
        Ok(listing)
    }

    async fn get_restaurant(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<RestaurantWithVisits>, Error> {
        match self.cache.restaurant(id).await {
            Ok(Some(entry)) => return Ok(Some(entry)),
            Ok(None) => {}
            Err(error) => log_cache_error("restaurant", &error),
        }

        let loaded_at = self.cache_generation().await;
        let entry = self.load_restaurant(id).await?;
        if let (Some(found), Some(loaded_at)) = (&entry, loaded_at) {
            if let Err(error) = self.cache.store_restaurant(found.clone(), loaded_at).await {
                log_cache_error("store_restaurant", &error);
            }
        }
        Ok(entry)
    }

    async fn listing_stats(&self) -> Result<ListingStats, Error> {
        let listing = self.list_restaurants(None, SortOption::Latest).await?;
        Ok(ListingStats::from_listing(&listing))
    }
}

#[async_trait]
impl<R, V, C> RestaurantCommand for RestaurantService<R, V, C>
where
    R: RestaurantRepository,
    V: VisitRepository,
    C: ListingCache,
{
    async fn create_restaurant(
        &self,
        caller: &Caller,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, Error> {
        caller.require_write()?;
        let restaurant = restaurant.into_restaurant(RestaurantId::random(), self.clock.utc());
        self.restaurants
            .insert(&restaurant)
            .await
            .map_err(map_restaurant_error)?;
        invalidate_after_mutation(self.cache.as_ref(), &restaurant.id).await;
        info!(restaurant_id = %restaurant.id, user_id = %caller.user_id(), "restaurant created");
        Ok(restaurant)
    }

    async fn delete_restaurant(&self, caller: &Caller, id: &RestaurantId) -> Result<(), Error> {
        caller.require_write()?;
        let deleted = self
            .restaurants
            .delete(id)
            .await
            .map_err(map_restaurant_error)?;
        if deleted {
            invalidate_after_mutation(self.cache.as_ref(), id).await;
            info!(restaurant_id = %id, user_id = %caller.user_id(), "restaurant deleted");
        }
        Ok(())
    }

    async fn toggle_favorite(
        &self,
        caller: &Caller,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, Error> {
        caller.require_write()?;
        let updated = self
            .restaurants
            .toggle_favorite(id)
            .await
            .map_err(map_restaurant_error)?;
        if updated.is_some() {
            invalidate_after_mutation(self.cache.as_ref(), id).await;
        }
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "restaurant_service_tests.rs"]
mod tests;
