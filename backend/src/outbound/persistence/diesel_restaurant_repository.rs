//! PostgreSQL-backed `RestaurantRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::dsl::not;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{RestaurantRepository, RestaurantRepositoryError};
use crate::domain::{Category, Restaurant, RestaurantId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRestaurantRow, RestaurantRow};
use super::pool::{DbPool, PoolError};
use super::schema::restaurants;

/// Diesel-backed implementation of the `RestaurantRepository` port.
#[derive(Clone)]
pub struct DieselRestaurantRepository {
    pool: DbPool,
}

impl DieselRestaurantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RestaurantRepositoryError {
    map_pool_error(error, RestaurantRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RestaurantRepositoryError {
    map_diesel_error(
        error,
        RestaurantRepositoryError::query,
        RestaurantRepositoryError::connection,
    )
}

fn row_to_restaurant(row: RestaurantRow) -> Result<Restaurant, RestaurantRepositoryError> {
    let category = Category::from_str(&row.category).map_err(|err| {
        warn!(restaurant_id = %row.id, value = %row.category, "unrecognised category in store");
        RestaurantRepositoryError::query(err.to_string())
    })?;
    Ok(Restaurant {
        id: RestaurantId::from_uuid(row.id),
        name: row.name,
        address: row.address,
        latitude: row.latitude,
        longitude: row.longitude,
        category,
        is_favorite: row.is_favorite,
        created_at: row.created_at,
    })
}

#[async_trait]
impl RestaurantRepository for DieselRestaurantRepository {
    async fn list(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Restaurant>, RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut query = restaurants::table
            .select(RestaurantRow::as_select())
            .order(restaurants::created_at.desc())
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(restaurants::category.eq(category.as_str()));
        }
        let rows: Vec<RestaurantRow> = query.load(&mut conn).await.map_err(diesel_error)?;

        rows.into_iter().map(row_to_restaurant).collect()
    }

    async fn find_by_id(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<RestaurantRow> = restaurants::table
            .find(id.as_uuid())
            .select(RestaurantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_restaurant).transpose()
    }

    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewRestaurantRow {
            id: *restaurant.id.as_uuid(),
            name: &restaurant.name,
            address: &restaurant.address,
            latitude: restaurant.latitude,
            longitude: restaurant.longitude,
            category: restaurant.category.as_str(),
            is_favorite: restaurant.is_favorite,
            created_at: restaurant.created_at,
        };
        diesel::insert_into(restaurants::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn delete(&self, id: &RestaurantId) -> Result<bool, RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let deleted = diesel::delete(restaurants::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn toggle_favorite(
        &self,
        id: &RestaurantId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<RestaurantRow> = diesel::update(restaurants::table.find(id.as_uuid()))
            .set(restaurants::is_favorite.eq(not(restaurants::is_favorite)))
            .returning(RestaurantRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_restaurant).transpose()
    }
}
