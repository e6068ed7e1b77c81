//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ListingCache`], [`PlaceSearch`]) return
//! typed port errors; driving ports (`*Query`, `*Command`) return the domain
//! [`Error`](crate::domain::Error) that HTTP handlers render.

mod macros;
pub(crate) use macros::define_port_error;

mod listing_cache;
mod place_search;
mod places_query;
mod restaurant_command;
mod restaurant_query;
mod restaurant_repository;
mod visit_command;
mod visit_image_query;
mod visit_repository;

#[cfg(test)]
pub use listing_cache::MockListingCache;
pub use listing_cache::{
    CacheGeneration, ListingCache, ListingCacheError, ListingKey, NoOpListingCache,
};
#[cfg(test)]
pub use place_search::MockPlaceSearch;
pub use place_search::{DisabledPlaceSearch, PLACE_SEARCH_LIMIT, PlaceSearch, PlaceSearchError};
#[cfg(test)]
pub use places_query::MockPlacesQuery;
pub use places_query::PlacesQuery;
#[cfg(test)]
pub use restaurant_command::MockRestaurantCommand;
pub use restaurant_command::{FixtureRestaurantCommand, RestaurantCommand};
#[cfg(test)]
pub use restaurant_query::MockRestaurantQuery;
pub use restaurant_query::{FixtureRestaurantQuery, RestaurantQuery};
#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
pub use restaurant_repository::{
    FixtureRestaurantRepository, RestaurantRepository, RestaurantRepositoryError,
};
#[cfg(test)]
pub use visit_command::MockVisitCommand;
pub use visit_command::{
    CreateVisitRequest, DeleteVisitRequest, FixtureVisitCommand, UpdateVisitRequest, VisitCommand,
};
#[cfg(test)]
pub use visit_image_query::MockVisitImageQuery;
pub use visit_image_query::{FixtureVisitImageQuery, VisitImageQuery};
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
pub use visit_repository::{FixtureVisitRepository, VisitRepository, VisitRepositoryError};

#[cfg(test)]
mod tests;
