//! Port for the external place search provider.

use async_trait::async_trait;

use crate::domain::{PlaceCandidate, PlaceQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by place search adapters.
    pub enum PlaceSearchError {
        /// Provider credentials are not configured.
        NotConfigured => "place search is not configured",
        /// Network failure, including timeouts.
        Transport { message: String } => "place search transport failed: {message}",
        /// Provider answered with a non-success status.
        Status { status: u16, message: String } =>
            "place search provider returned {status}: {message}",
        /// Provider payload could not be decoded.
        Decode { message: String } => "place search response was malformed: {message}",
    }
}

/// Upper bound on candidates returned per query.
pub const PLACE_SEARCH_LIMIT: usize = 5;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Search for places; at most [`PLACE_SEARCH_LIMIT`] candidates.
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceCandidate>, PlaceSearchError>;
}

/// Stand-in used when no provider credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPlaceSearch;

#[async_trait]
impl PlaceSearch for DisabledPlaceSearch {
    async fn search(&self, _query: &PlaceQuery) -> Result<Vec<PlaceCandidate>, PlaceSearchError> {
        Err(PlaceSearchError::not_configured())
    }
}
