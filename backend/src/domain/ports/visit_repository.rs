//! Port for visit persistence.

use async_trait::async_trait;

use crate::domain::{ImageUpdate, RestaurantId, Visit, VisitDetails, VisitId, VisitSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by visit repository adapters.
    pub enum VisitRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "visit repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "visit repository query failed: {message}",
    }
}

/// Port for reading and writing visit rows.
///
/// Listing reads never load image bytes; [`VisitRepository::find_image`] is
/// the only read that does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Summaries of every visit belonging to any of `restaurant_ids`.
    async fn list_summaries_for(
        &self,
        restaurant_ids: &[RestaurantId],
    ) -> Result<Vec<VisitSummary>, VisitRepositoryError>;

    /// Fetch a visit, image included.
    async fn find_by_id(&self, id: &VisitId) -> Result<Option<Visit>, VisitRepositoryError>;

    /// Insert a new visit.
    async fn insert(&self, visit: &Visit) -> Result<(), VisitRepositoryError>;

    /// Overwrite the editable fields of a visit in one statement.
    ///
    /// Returns `None` when the visit no longer exists.
    async fn update(
        &self,
        id: &VisitId,
        details: &VisitDetails,
        image: &ImageUpdate,
    ) -> Result<Option<VisitSummary>, VisitRepositoryError>;

    /// Delete a visit. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &VisitId) -> Result<bool, VisitRepositoryError>;

    /// Raw image bytes for a visit, `None` when the visit or its image is
    /// absent.
    async fn find_image(&self, id: &VisitId) -> Result<Option<Vec<u8>>, VisitRepositoryError>;
}

/// Fixture implementation holding no visits.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVisitRepository;

#[async_trait]
impl VisitRepository for FixtureVisitRepository {
    async fn list_summaries_for(
        &self,
        _restaurant_ids: &[RestaurantId],
    ) -> Result<Vec<VisitSummary>, VisitRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &VisitId) -> Result<Option<Visit>, VisitRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _visit: &Visit) -> Result<(), VisitRepositoryError> {
        Ok(())
    }

    async fn update(
        &self,
        _id: &VisitId,
        _details: &VisitDetails,
        _image: &ImageUpdate,
    ) -> Result<Option<VisitSummary>, VisitRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &VisitId) -> Result<bool, VisitRepositoryError> {
        Ok(false)
    }

    async fn find_image(&self, _id: &VisitId) -> Result<Option<Vec<u8>>, VisitRepositoryError> {
        Ok(None)
    }
}
