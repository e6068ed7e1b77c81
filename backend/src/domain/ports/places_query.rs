//! Driving port for place lookups.

use async_trait::async_trait;

use crate::domain::{Error, PlaceCandidate, PlaceQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesQuery: Send + Sync {
    /// Candidate places for a free-text query.
    async fn search_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceCandidate>, Error>;
}
