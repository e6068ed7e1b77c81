//! Domain primitives, aggregates and services.
//!
//! Purpose: define the restaurant and visit model, the pure listing logic
//! (aggregation, filtering, statistics) and the services that implement the
//! driving ports on top of the driven ports in [`ports`].
//!
//! Public surface:
//! - Error, ErrorCode: API error payload and its stable code.
//! - Restaurant, Visit and their identifiers and value types.
//! - RestaurantWithVisits, assemble_listing, ListingFilter, ListingStats.
//! - UserRegistry, User, Caller: the fixed identities and their capability.
//! - RestaurantService, VisitService, PlaceSearchService.

pub mod error;
mod filter;
mod listing;
mod place_search_service;
mod places;
pub mod ports;
mod restaurant;
mod restaurant_service;
mod stats;
pub mod trace_id;
pub mod user;
mod visit;
mod visit_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::filter::ListingFilter;
pub use self::listing::{
    AverageRating, RestaurantWithVisits, SortOption, UnknownSortOption, assemble_listing,
    sort_listing,
};
pub use self::place_search_service::PlaceSearchService;
pub use self::places::{
    Coordinates, PlaceCandidate, PlaceQuery, PlaceQueryError, convert_provider_coordinates,
};
pub use self::restaurant::{
    Category, NewRestaurant, NewRestaurantDraft, Restaurant, RestaurantId,
    RestaurantValidationError, UnknownCategory,
};
pub use self::restaurant_service::RestaurantService;
pub use self::stats::{CategoryBreakdown, ListingStats, RankedRestaurant, TOP_LIMIT};
pub use self::trace_id::TraceId;
pub use self::user::{Access, Caller, User, UserId, UserRegistry, UserValidationError};
pub use self::visit::{
    ImageUpdate, PriceTier, Rating, UnknownPriceTier, Visit, VisitDetails, VisitDetailsDraft,
    VisitId, VisitSummary, VisitValidationError,
};
pub use self::visit_service::VisitService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use lunchlog::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
