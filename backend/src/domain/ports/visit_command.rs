//! Driving port for visit mutations.
//!
//! Handlers build the request structs from validated input; the service
//! enforces the capability and authorship rules.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Caller, Error, ImageUpdate, RestaurantId, Visit, VisitDetails, VisitId, VisitSummary,
};

/// Log a visit at an existing restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateVisitRequest {
    pub restaurant_id: RestaurantId,
    pub details: VisitDetails,
    /// Decoded image bytes.
    pub image: Option<Vec<u8>>,
}

/// Replace the editable fields of a visit.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateVisitRequest {
    pub restaurant_id: RestaurantId,
    pub visit_id: VisitId,
    pub details: VisitDetails,
    pub image: ImageUpdate,
}

/// Remove a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteVisitRequest {
    pub restaurant_id: RestaurantId,
    pub visit_id: VisitId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitCommand: Send + Sync {
    /// Create a visit authored by the caller.
    ///
    /// # Errors
    ///
    /// `forbidden` for readonly callers, `not_found` when the restaurant does
    /// not exist.
    async fn create_visit(
        &self,
        caller: &Caller,
        request: CreateVisitRequest,
    ) -> Result<VisitSummary, Error>;

    /// Update a visit the caller authored.
    ///
    /// # Errors
    ///
    /// `not_found` when the visit is missing or belongs to another
    /// restaurant, `forbidden` when the caller is not its author.
    async fn update_visit(
        &self,
        caller: &Caller,
        request: UpdateVisitRequest,
    ) -> Result<VisitSummary, Error>;

    /// Delete a visit the caller authored, with the same checks as update.
    async fn delete_visit(&self, caller: &Caller, request: DeleteVisitRequest)
    -> Result<(), Error>;
}

/// Fixture command that builds visits without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVisitCommand;

#[async_trait]
impl VisitCommand for FixtureVisitCommand {
    async fn create_visit(
        &self,
        caller: &Caller,
        request: CreateVisitRequest,
    ) -> Result<VisitSummary, Error> {
        caller.require_write()?;
        let visit = Visit::create(
            VisitId::random(),
            request.restaurant_id,
            caller.user_id().clone(),
            request.details,
            request.image,
            Utc::now(),
        );
        Ok(visit.summary())
    }

    async fn update_visit(
        &self,
        _caller: &Caller,
        request: UpdateVisitRequest,
    ) -> Result<VisitSummary, Error> {
        Err(Error::not_found(format!("visit {} not found", request.visit_id)))
    }

    async fn delete_visit(
        &self,
        _caller: &Caller,
        request: DeleteVisitRequest,
    ) -> Result<(), Error> {
        Err(Error::not_found(format!("visit {} not found", request.visit_id)))
    }
}
