//! Place search use-case on top of the [`PlaceSearch`] port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{PLACE_SEARCH_LIMIT, PlaceSearch, PlaceSearchError, PlacesQuery};
use crate::domain::{Error, PlaceCandidate, PlaceQuery};

/// Implements [`PlacesQuery`].
#[derive(Clone)]
pub struct PlaceSearchService<S> {
    search: Arc<S>,
}

impl<S> PlaceSearchService<S> {
    pub fn new(search: Arc<S>) -> Self {
        Self { search }
    }
}

fn map_place_search_error(error: PlaceSearchError) -> Error {
    match error {
        PlaceSearchError::NotConfigured => {
            Error::service_unavailable("place search is not configured")
        }
        PlaceSearchError::Transport { message } => {
            Error::service_unavailable(format!("place search unavailable: {message}"))
        }
        PlaceSearchError::Status { status, message } => Error::service_unavailable(format!(
            "place search provider returned {status}: {message}"
        )),
        PlaceSearchError::Decode { message } => {
            Error::internal(format!("place search response malformed: {message}"))
        }
    }
}

#[async_trait]
impl<S> PlacesQuery for PlaceSearchService<S>
where
    S: PlaceSearch,
{
    async fn search_places(&self, query: &PlaceQuery) -> Result<Vec<PlaceCandidate>, Error> {
        let mut candidates = self
            .search
            .search(query)
            .await
            .map_err(map_place_search_error)?;
        candidates.truncate(PLACE_SEARCH_LIMIT);
        Ok(candidates)
    }
}
