//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of utoipa derives. The wrappers here mirror the
//! JSON shape the domain types serialise to and are only referenced from
//! `#[utoipa::path]` attributes and [`crate::doc::ApiDoc`].

#![expect(
    dead_code,
    reason = "Schema wrappers are never constructed; utoipa reads their shape"
)]

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// API error envelope.
#[derive(ToSchema)]
#[schema(as = Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "menu must not be empty")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "6f1c8f5e-2d0b-4b8e-9d57-0d3f2a6c7e11")]
    trace_id: Option<String>,
    /// Field and code of a validation failure.
    details: Option<serde_json::Value>,
}

#[derive(ToSchema)]
#[schema(as = Access)]
pub enum AccessSchema {
    #[schema(rename = "full")]
    Full,
    #[schema(rename = "readonly")]
    Readonly,
}

/// A registered identity.
#[derive(ToSchema)]
#[schema(as = User)]
#[serde(rename_all = "camelCase")]
pub struct UserSchema {
    #[schema(example = "minju")]
    id: String,
    #[schema(example = "민주")]
    display_name: String,
    access: AccessSchema,
}

/// Cuisine category label.
#[derive(ToSchema)]
#[schema(as = Category)]
pub enum CategorySchema {
    #[schema(rename = "한식")]
    Korean,
    #[schema(rename = "중식")]
    Chinese,
    #[schema(rename = "일식")]
    Japanese,
    #[schema(rename = "양식")]
    Western,
    #[schema(rename = "분식")]
    Snack,
    #[schema(rename = "기타")]
    Other,
}

#[derive(ToSchema)]
#[schema(as = PriceTier)]
pub enum PriceTierSchema {
    #[schema(rename = "LOW")]
    Low,
    #[schema(rename = "MID")]
    Mid,
    #[schema(rename = "HIGH")]
    High,
}

/// A stored restaurant.
#[derive(ToSchema)]
#[schema(as = Restaurant)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "Kim's BBQ")]
    name: String,
    address: String,
    #[schema(example = 37.4979)]
    latitude: f64,
    #[schema(example = 127.0276)]
    longitude: f64,
    category: CategorySchema,
    is_favorite: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// A visit; the image is served separately when `hasImage` is set.
#[derive(ToSchema)]
#[schema(as = Visit)]
#[serde(rename_all = "camelCase")]
pub struct VisitSummarySchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(value_type = String, format = Uuid)]
    restaurant_id: String,
    /// Author; absent for legacy visits.
    user_id: Option<String>,
    menu: String,
    /// One decimal, 0.5 to 5.0.
    #[schema(example = 4.5)]
    rating: Option<f64>,
    price: Option<PriceTierSchema>,
    comment: Option<String>,
    has_image: bool,
    #[schema(value_type = String, format = Date)]
    visited_at: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// A restaurant with its visits, newest visit first.
#[derive(ToSchema)]
#[schema(as = RestaurantWithVisits)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantWithVisitsSchema {
    #[serde(flatten)]
    restaurant: RestaurantSchema,
    visits: Vec<VisitSummarySchema>,
    /// Rounded half-up to one decimal; absent without ratings.
    average_rating: Option<f64>,
    visit_count: u32,
}

#[derive(ToSchema)]
#[schema(as = CategoryBreakdown)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownSchema {
    category: CategorySchema,
    restaurant_count: u32,
    visit_count: u32,
}

#[derive(ToSchema)]
#[schema(as = RankedRestaurant)]
#[serde(rename_all = "camelCase")]
pub struct RankedRestaurantSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    name: String,
    category: CategorySchema,
    visit_count: u32,
    average_rating: Option<f64>,
}

/// Aggregate statistics over every listed restaurant.
#[derive(ToSchema)]
#[schema(as = ListingStats)]
#[serde(rename_all = "camelCase")]
pub struct ListingStatsSchema {
    restaurant_count: u32,
    visit_count: u32,
    categories: Vec<CategoryBreakdownSchema>,
    most_visited: Vec<RankedRestaurantSchema>,
    top_rated: Vec<RankedRestaurantSchema>,
}

/// A place returned by the search provider.
#[derive(ToSchema)]
#[schema(as = PlaceCandidate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidateSchema {
    name: String,
    address: String,
    road_address: String,
    category: String,
    latitude: f64,
    longitude: f64,
}
