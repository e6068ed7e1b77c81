//! Driving port for restaurant mutations.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Caller, Error, NewRestaurant, Restaurant, RestaurantId};

/// Every operation rejects readonly callers before touching the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantCommand: Send + Sync {
    /// Register a restaurant. Duplicates are allowed.
    async fn create_restaurant(
        &self,
        caller: &Caller,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, Error>;

    /// Delete a restaurant and its visits; absent ids are a no-op.
    async fn delete_restaurant(&self, caller: &Caller, id: &RestaurantId) -> Result<(), Error>;

    /// Flip the favorite flag; `None` when the restaurant is absent.
    async fn toggle_favorite(
        &self,
        caller: &Caller,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, Error>;
}

/// Fixture command that echoes input without persisting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRestaurantCommand;

#[async_trait]
impl RestaurantCommand for FixtureRestaurantCommand {
    async fn create_restaurant(
        &self,
        caller: &Caller,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, Error> {
        caller.require_write()?;
        Ok(restaurant.into_restaurant(RestaurantId::random(), Utc::now()))
    }

    async fn delete_restaurant(&self, caller: &Caller, _id: &RestaurantId) -> Result<(), Error> {
        caller.require_write()
    }

    async fn toggle_favorite(
        &self,
        caller: &Caller,
        _id: &RestaurantId,
    ) -> Result<Option<Restaurant>, Error> {
        caller.require_write()?;
        Ok(None)
    }
}
