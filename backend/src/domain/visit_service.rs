//! Visit mutation service and image lookup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CreateVisitRequest, DeleteVisitRequest, ListingCache, RestaurantRepository,
    UpdateVisitRequest, VisitCommand, VisitImageQuery, VisitRepository,
};
use crate::domain::restaurant_service::{
    invalidate_after_mutation, map_restaurant_error, map_visit_error,
};
use crate::domain::{Caller, Error, RestaurantId, Visit, VisitId, VisitSummary};

/// Implements [`VisitCommand`] and [`VisitImageQuery`].
#[derive(Clone)]
pub struct VisitService<R, V, C> {
    restaurants: Arc<R>,
    visits: Arc<V>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, V, C> VisitService<R, V, C> {
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

fn visit_not_found(id: &VisitId) -> Error {
    Error::not_found(format!("visit {id} not found"))
}

impl<R, V, C> VisitService<R, V, C>
where
    R: RestaurantRepository,
    V: VisitRepository,
    C: ListingCache,
{
    /// Load a visit the caller may modify.
    ///
    /// Missing visits, and visits filed under another restaurant, are
    /// `not_found`; visits by someone else are `forbidden`.
    async fn authored_visit(
        &self,
        caller: &Caller,
        restaurant_id: &RestaurantId,
        visit_id: &VisitId,
    ) -> Result<Visit, Error> {
        caller.require_write()?;
        let visit = self
            .visits
            .find_by_id(visit_id)
            .await
            .map_err(map_visit_error)?
            .filter(|visit| visit.restaurant_id == *restaurant_id)
            .ok_or_else(|| visit_not_found(visit_id))?;
        if !caller.is_author_of(visit.user_id.as_ref()) {
            return Err(Error::forbidden(format!(
                "user {} did not write visit {visit_id}",
                caller.user_id()
            )));
        }
        Ok(visit)
    }
}

#[async_trait]
impl<R, V, C> VisitCommand for VisitService<R, V, C>
where
    R: RestaurantRepository,
    V: VisitRepository,
    C: ListingCache,
{
    async fn create_visit(
        &self,
        caller: &Caller,
        request: CreateVisitRequest,
    ) -> Result<VisitSummary, Error> {
        caller.require_write()?;
        let CreateVisitRequest {
            restaurant_id,
            details,
            image,
        } = request;
        if self
            .restaurants
            .find_by_id(&restaurant_id)
            .await
            .map_err(map_restaurant_error)?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "restaurant {restaurant_id} not found"
            )));
        }

        let visit = Visit::create(
            VisitId::random(),
            restaurant_id,
            caller.user_id().clone(),
            details,
            image,
            self.clock.utc(),
        );
        self.visits.insert(&visit).await.map_err(map_visit_error)?;
        invalidate_after_mutation(self.cache.as_ref(), &restaurant_id).await;
        info!(
            visit_id = %visit.id,
            restaurant_id = %restaurant_id,
            user_id = %caller.user_id(),
            "visit created"
        );
        Ok(visit.summary())
    }

    async fn update_visit(
        &self,
        caller: &Caller,
        request: UpdateVisitRequest,
    ) -> Result<VisitSummary, Error> {
        let UpdateVisitRequest {
            restaurant_id,
            visit_id,
            details,
            image,
        } = request;
        self.authored_visit(caller, &restaurant_id, &visit_id).await?;

        let updated = self
            .visits
            .update(&visit_id, &details, &image)
            .await
            .map_err(map_visit_error)?
            .ok_or_else(|| visit_not_found(&visit_id))?;
        invalidate_after_mutation(self.cache.as_ref(), &restaurant_id).await;
        info!(visit_id = %visit_id, user_id = %caller.user_id(), "visit updated");
        Ok(updated)
    }

    async fn delete_visit(
        &self,
        caller: &Caller,
        request: DeleteVisitRequest,
    ) -> Result<(), Error> {
        let DeleteVisitRequest {
            restaurant_id,
            visit_id,
        } = request;
        self.authored_visit(caller, &restaurant_id, &visit_id).await?;

        if self.visits.delete(&visit_id).await.map_err(map_visit_error)? {
            invalidate_after_mutation(self.cache.as_ref(), &restaurant_id).await;
            info!(visit_id = %visit_id, user_id = %caller.user_id(), "visit deleted");
        }
        Ok(())
    }
}

#[async_trait]
impl<R, V, C> VisitImageQuery for VisitService<R, V, C>
where
    R: RestaurantRepository,
    V: VisitRepository,
    C: ListingCache,
{
    async fn visit_image(&self, id: &VisitId) -> Result<Option<Vec<u8>>, Error> {
        self.visits.find_image(id).await.map_err(map_visit_error)
    }
}

#[cfg(test)]
#[path = "visit_service_tests.rs"]
mod tests;
