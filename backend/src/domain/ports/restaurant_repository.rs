//! Port for restaurant persistence.

use async_trait::async_trait;

use crate::domain::{Category, Restaurant, RestaurantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by restaurant repository adapters.
    pub enum RestaurantRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "restaurant repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "restaurant repository query failed: {message}",
    }
}

/// Port for reading and writing restaurant rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// List restaurants newest first, optionally restricted to one category.
    async fn list(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Restaurant>, RestaurantRepositoryError>;

    /// Find a restaurant by id.
    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError>;

    /// Insert a new restaurant.
    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError>;

    /// Delete a restaurant and, through the store's cascade, its visits.
    ///
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantRepositoryError>;

    /// Flip the favorite flag in a single statement and return the new row.
    async fn toggle_favorite(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError>;
}

/// Fixture implementation holding no restaurants.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRestaurantRepository;

#[async_trait]
impl RestaurantRepository for FixtureRestaurantRepository {
    async fn list(
        &self,
        _category: Option<Category>,
    ) -> Result<Vec<Restaurant>, RestaurantRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &RestaurantId) -> Result<bool, RestaurantRepositoryError> {
        Ok(false)
    }

    async fn toggle_favorite(
        &self,
        _id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        Ok(None)
    }
}
