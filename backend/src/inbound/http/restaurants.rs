//! Restaurant handlers.
//!
//! ```text
//! GET    /api/v1/restaurants?category=한식&sort=rating&favoritesOnly=true&q=galbi
//! POST   /api/v1/restaurants
//! GET    /api/v1/restaurants/{id}
//! DELETE /api/v1/restaurants/{id}
//! POST   /api/v1/restaurants/{id}/favorite
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    Category, Error, ListingFilter, NewRestaurant, NewRestaurantDraft, RestaurantId,
    RestaurantValidationError, SortOption,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{ErrorSchema, RestaurantSchema, RestaurantWithVisitsSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_optional, parse_uuid};

const ID_FIELD: FieldName = FieldName::new("id");
const CATEGORY_FIELD: FieldName = FieldName::new("category");
const SORT_FIELD: FieldName = FieldName::new("sort");

/// Query string for `GET /api/v1/restaurants`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// Exact category label, e.g. `한식`.
    pub category: Option<String>,
    /// `latest` (default), `rating` or `name`.
    pub sort: Option<String>,
    /// Only favourites when `true`.
    pub favorites_only: Option<bool>,
    /// Case-insensitive text over name, address and visit menus.
    pub q: Option<String>,
}

/// Request body for `POST /api/v1/restaurants`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[schema(example = "한식")]
    pub category: String,
}

pub(crate) fn parse_restaurant_id(raw: &str) -> Result<RestaurantId, Error> {
    parse_uuid(raw, ID_FIELD).map(RestaurantId::from_uuid)
}

fn map_restaurant_validation_error(err: RestaurantValidationError) -> Error {
    let (field, code) = match err {
        RestaurantValidationError::BlankName => ("name", "blank_name"),
        RestaurantValidationError::BlankAddress => ("address", "blank_address"),
        RestaurantValidationError::LatitudeOutOfRange => ("latitude", "latitude_out_of_range"),
        RestaurantValidationError::LongitudeOutOfRange => ("longitude", "longitude_out_of_range"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

impl TryFrom<CreateRestaurantRequest> for NewRestaurant {
    type Error = Error;

    fn try_from(value: CreateRestaurantRequest) -> Result<Self, Self::Error> {
        let category = parse_optional::<Category>(Some(value.category.as_str()), CATEGORY_FIELD)?
            .ok_or_else(|| {
                field_error(CATEGORY_FIELD, "missing_field", "missing required field: category")
            })?;
        NewRestaurant::new(NewRestaurantDraft {
            name: value.name,
            address: value.address,
            latitude: value.latitude,
            longitude: value.longitude,
            category,
        })
        .map_err(map_restaurant_validation_error)
    }
}

/// List restaurants that have at least one visit.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    params(ListingParams),
    responses(
        (status = 200, description = "Listing", body = [RestaurantWithVisitsSchema],
            headers(("Cache-Control" = String, description = "private, no-cache, must-revalidate"))),
        (status = 400, description = "Unknown category or sort option", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "listRestaurants"
)]
#[get("/restaurants")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
    params: web::Query<ListingParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let category = parse_optional::<Category>(params.category.as_deref(), CATEGORY_FIELD)?;
    let sort = parse_optional::<SortOption>(params.sort.as_deref(), SORT_FIELD)?.unwrap_or_default();

    let listing = state.restaurants.list_restaurants(category, sort).await?;
    let filter = ListingFilter {
        favorites_only: params.favorites_only.unwrap_or(false),
        category: None,
        query: params.q,
    };
    let listing = filter.apply(listing);
    debug!(count = listing.len(), ?sort, "listing served");

    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(listing))
}

/// Create a restaurant; the first visit is added separately.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Created", body = RestaurantSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Readonly identity", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "createRestaurant"
)]
#[post("/restaurants")]
pub async fn create_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRestaurantRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.writer(&state.users)?;
    let new_restaurant = NewRestaurant::try_from(payload.into_inner())?;
    let restaurant = state
        .restaurant_commands
        .create_restaurant(&caller, new_restaurant)
        .await?;
    Ok(HttpResponse::Created().json(restaurant))
}

/// One restaurant with its visits, including restaurants without visits.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant", body = RestaurantWithVisitsSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No such restaurant", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "getRestaurant"
)]
#[get("/restaurants/{id}")]
pub async fn get_restaurant(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_restaurant_id(&path.into_inner())?;
    let restaurant = state
        .restaurants
        .get_restaurant(&id)
        .await?
        .ok_or_else(|| Error::not_found(format!("restaurant {id} not found")))?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(restaurant))
}

/// Delete a restaurant and its visits; deleting an absent id succeeds.
#[utoipa::path(
    delete,
    path = "/api/v1/restaurants/{id}",
    params(("id" = String, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 403, description = "Readonly identity", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "deleteRestaurant"
)]
#[delete("/restaurants/{id}")]
pub async fn delete_restaurant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.writer(&state.users)?;
    let id = parse_restaurant_id(&path.into_inner())?;
    state
        .restaurant_commands
        .delete_restaurant(&caller, &id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Flip the favourite flag.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants/{id}/favorite",
    params(("id" = String, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Updated restaurant", body = RestaurantSchema),
        (status = 403, description = "Readonly identity", body = ErrorSchema),
        (status = 404, description = "No such restaurant", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "toggleFavorite"
)]
#[post("/restaurants/{id}/favorite")]
pub async fn toggle_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.writer(&state.users)?;
    let id = parse_restaurant_id(&path.into_inner())?;
    let restaurant = state
        .restaurant_commands
        .toggle_favorite(&caller, &id)
        .await?
        .ok_or_else(|| Error::not_found(format!("restaurant {id} not found")))?;
    Ok(HttpResponse::Ok().json(restaurant))
}

#[cfg(test)]
#[path = "restaurants_tests.rs"]
mod tests;
