//! PostgreSQL-backed `VisitRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{VisitRepository, VisitRepositoryError};
use crate::domain::{
    ImageUpdate, PriceTier, Rating, RestaurantId, UserId, Visit, VisitDetails, VisitId,
    VisitSummary,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewVisitRow, VisitDetailsUpdate, VisitRow, VisitSummaryRow};
use super::numeric::{decimal_to_rating, rating_to_decimal};
use super::pool::{DbPool, PoolError};
use super::schema::visits;

/// Diesel-backed implementation of the `VisitRepository` port.
#[derive(Clone)]
pub struct DieselVisitRepository {
    pool: DbPool,
}

impl DieselVisitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> VisitRepositoryError {
    map_pool_error(error, VisitRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> VisitRepositoryError {
    map_diesel_error(
        error,
        VisitRepositoryError::query,
        VisitRepositoryError::connection,
    )
}

/// Columns shared by full rows and summaries, decoded into domain values.
struct DecodedColumns {
    user_id: Option<UserId>,
    rating: Option<Rating>,
    price: Option<PriceTier>,
}

fn decode_columns(
    visit_id: Uuid,
    user_id: Option<String>,
    rating: Option<&BigDecimal>,
    price: Option<String>,
) -> Result<DecodedColumns, VisitRepositoryError> {
    // Unknown authors stay attached to the visit as "no author" so the row
    // remains readable but not editable.
    let user_id = user_id.and_then(|raw| match UserId::new(raw.as_str()) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(visit_id = %visit_id, value = %raw, error = %err, "invalid author in store");
            None
        }
    });
    let rating = match rating {
        Some(value) => Some(decimal_to_rating(value).ok_or_else(|| {
            VisitRepositoryError::query(format!("visit {visit_id} has invalid rating {value}"))
        })?),
        None => None,
    };
    let price = price
        .map(|raw| PriceTier::from_str(&raw))
        .transpose()
        .map_err(|err| VisitRepositoryError::query(err.to_string()))?;
    Ok(DecodedColumns {
        user_id,
        rating,
        price,
    })
}

fn row_to_summary(row: VisitSummaryRow) -> Result<VisitSummary, VisitRepositoryError> {
    let decoded = decode_columns(row.id, row.user_id, row.rating.as_ref(), row.price)?;
    Ok(VisitSummary {
        id: VisitId::from_uuid(row.id),
        restaurant_id: RestaurantId::from_uuid(row.restaurant_id),
        user_id: decoded.user_id,
        menu: row.menu,
        rating: decoded.rating,
        price: decoded.price,
        comment: row.comment,
        has_image: row.has_image,
        visited_at: row.visited_at,
        created_at: row.created_at,
    })
}

fn row_to_visit(row: VisitRow) -> Result<Visit, VisitRepositoryError> {
    let decoded = decode_columns(row.id, row.user_id, row.rating.as_ref(), row.price)?;
    Ok(Visit {
        id: VisitId::from_uuid(row.id),
        restaurant_id: RestaurantId::from_uuid(row.restaurant_id),
        user_id: decoded.user_id,
        menu: row.menu,
        rating: decoded.rating,
        price: decoded.price,
        comment: row.comment,
        image: row.image,
        visited_at: row.visited_at,
        created_at: row.created_at,
    })
}

#[async_trait]
impl VisitRepository for DieselVisitRepository {
    async fn list_summaries_for(
        &self,
        restaurant_ids: &[RestaurantId],
    ) -> Result<Vec<VisitSummary>, VisitRepositoryError> {
        if restaurant_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let ids: Vec<Uuid> = restaurant_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<VisitSummaryRow> = visits::table
            .filter(visits::restaurant_id.eq_any(ids))
            .select(VisitSummaryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(row_to_summary).collect()
    }

    async fn find_by_id(&self, id: &VisitId) -> Result<Option<Visit>, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<VisitRow> = visits::table
            .find(id.as_uuid())
            .select(VisitRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_visit).transpose()
    }

    async fn insert(&self, visit: &Visit) -> Result<(), VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewVisitRow {
            id: *visit.id.as_uuid(),
            restaurant_id: *visit.restaurant_id.as_uuid(),
            user_id: visit.user_id.as_ref().map(|id| id.as_ref()),
            menu: &visit.menu,
            rating: visit.rating.map(rating_to_decimal),
            price: visit.price.map(PriceTier::as_str),
            comment: visit.comment.as_deref(),
            image: visit.image.as_deref(),
            visited_at: visit.visited_at,
            created_at: visit.created_at,
        };
        diesel::insert_into(visits::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(
        &self,
        id: &VisitId,
        details: &VisitDetails,
        image: &ImageUpdate,
    ) -> Result<Option<VisitSummary>, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changes = VisitDetailsUpdate {
            menu: details.menu(),
            rating: details.rating().map(rating_to_decimal),
            price: details.price().map(PriceTier::as_str),
            comment: details.comment(),
            visited_at: details.visited_at(),
        };
        let target = visits::table.find(id.as_uuid());
        let row: Option<VisitSummaryRow> = match image {
            ImageUpdate::Keep => diesel::update(target)
                .set(&changes)
                .returning(VisitSummaryRow::as_returning())
                .get_result(&mut conn)
                .await,
            ImageUpdate::Replace(bytes) => diesel::update(target)
                .set((&changes, visits::image.eq(Some(bytes.as_slice()))))
                .returning(VisitSummaryRow::as_returning())
                .get_result(&mut conn)
                .await,
            ImageUpdate::Clear => diesel::update(target)
                .set((&changes, visits::image.eq(None::<&[u8]>)))
                .returning(VisitSummaryRow::as_returning())
                .get_result(&mut conn)
                .await,
        }
        .optional()
        .map_err(diesel_error)?;

        row.map(row_to_summary).transpose()
    }

    async fn delete(&self, id: &VisitId) -> Result<bool, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let deleted = diesel::delete(visits::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_image(&self, id: &VisitId) -> Result<Option<Vec<u8>>, VisitRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let image: Option<Option<Vec<u8>>> = visits::table
            .find(id.as_uuid())
            .select(visits::image)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(image.flatten())
    }
}
