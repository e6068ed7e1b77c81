//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound HTTP layer along
//! with the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives. The document is served by Swagger UI
//! in debug builds and printed by the `openapi-dump` binary.

use crate::inbound::http::restaurants::CreateRestaurantRequest;
use crate::inbound::http::schemas::{
    AccessSchema, CategoryBreakdownSchema, CategorySchema, ErrorCodeSchema, ErrorSchema,
    ListingStatsSchema, PlaceCandidateSchema, PriceTierSchema, RankedRestaurantSchema,
    RestaurantSchema, RestaurantWithVisitsSchema, UserSchema, VisitSummarySchema,
};
use crate::inbound::http::users::SelectUserRequest;
use crate::inbound::http::visits::VisitRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the identity selected via PUT /api/v1/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Lunchlog API",
        description = "Shared restaurant list and visit log for a small group of colleagues."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_session,
        crate::inbound::http::users::select_user,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::restaurants::create_restaurant,
        crate::inbound::http::restaurants::get_restaurant,
        crate::inbound::http::restaurants::delete_restaurant,
        crate::inbound::http::restaurants::toggle_favorite,
        crate::inbound::http::visits::create_visit,
        crate::inbound::http::visits::update_visit,
        crate::inbound::http::visits::delete_visit,
        crate::inbound::http::visits::visit_image,
        crate::inbound::http::stats::listing_stats,
        crate::inbound::http::places::search_places,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AccessSchema,
        UserSchema,
        CategorySchema,
        PriceTierSchema,
        RestaurantSchema,
        VisitSummarySchema,
        RestaurantWithVisitsSchema,
        CategoryBreakdownSchema,
        RankedRestaurantSchema,
        ListingStatsSchema,
        PlaceCandidateSchema,
        SelectUserRequest,
        CreateRestaurantRequest,
        VisitRequest,
    )),
    tags(
        (name = "users", description = "Identity selection"),
        (name = "restaurants", description = "Restaurant listing, creation and favourites"),
        (name = "visits", description = "Visit records and their images"),
        (name = "places", description = "External place search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
