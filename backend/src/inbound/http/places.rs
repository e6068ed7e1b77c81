//! Place search handler.
//!
//! ```text
//! GET /api/v1/places?query=강남 맛집
//! ```

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{Error, PlaceCandidate, PlaceQuery, PlaceQueryError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PlaceCandidateSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, missing_field_error};

const QUERY_FIELD: FieldName = FieldName::new("query");

/// Query string for `GET /api/v1/places`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlaceSearchParams {
    /// Free text passed to the provider.
    pub query: Option<String>,
}

fn map_place_query_error(err: PlaceQueryError) -> Error {
    let code = match err {
        PlaceQueryError::Blank => "blank_query",
        PlaceQueryError::TooLong { .. } => "query_too_long",
    };
    field_error(QUERY_FIELD, code, err.to_string())
}

/// Look up candidate places for a new restaurant.
#[utoipa::path(
    get,
    path = "/api/v1/places",
    params(PlaceSearchParams),
    responses(
        (status = 200, description = "Up to five candidates", body = [PlaceCandidateSchema]),
        (status = 400, description = "Missing or blank query", body = ErrorSchema),
        (status = 503, description = "Provider unavailable or not configured", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "searchPlaces"
)]
#[get("/places")]
pub async fn search_places(
    state: web::Data<HttpState>,
    params: web::Query<PlaceSearchParams>,
) -> ApiResult<web::Json<Vec<PlaceCandidate>>> {
    let raw = params
        .into_inner()
        .query
        .ok_or_else(|| missing_field_error(QUERY_FIELD))?;
    let query = PlaceQuery::new(&raw).map_err(map_place_query_error)?;
    let candidates = state.places.search_places(&query).await?;
    Ok(web::Json(candidates))
}
