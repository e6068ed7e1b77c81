//! Visit handlers.
//!
//! ```text
//! POST   /api/v1/restaurants/{id}/visits
//! PUT    /api/v1/restaurants/{id}/visits/{visitId}
//! DELETE /api/v1/restaurants/{id}/visits/{visitId}
//! GET    /api/v1/visits/{visitId}/image
//! ```
//!
//! Images travel as base64 in `imageBase64` and are stored as raw bytes.
//! Listings only expose `hasImage`; the bytes come from the image endpoint.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CreateVisitRequest, DeleteVisitRequest, UpdateVisitRequest};
use crate::domain::{
    Error, ImageUpdate, PriceTier, Rating, VisitDetails, VisitDetailsDraft, VisitId,
    VisitValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::public_immutable_header;
use crate::inbound::http::restaurants::parse_restaurant_id;
use crate::inbound::http::schemas::{ErrorSchema, VisitSummarySchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, decode_base64, field_error, parse_date, parse_optional, parse_uuid,
};

const VISIT_ID_FIELD: FieldName = FieldName::new("visitId");
const PRICE_FIELD: FieldName = FieldName::new("price");
const IMAGE_FIELD: FieldName = FieldName::new("imageBase64");
const VISITED_AT_FIELD: FieldName = FieldName::new("visitedAt");

/// Request body shared by visit creation and update.
///
/// `keepExistingImage` only matters for updates without new image data:
/// `true` (the default) leaves the stored image alone, `false` removes it.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequest {
    #[schema(example = "Galbi")]
    pub menu: String,
    /// 0.5 to 5.0, one decimal.
    #[schema(example = 4.5)]
    pub rating: Option<f64>,
    /// `LOW`, `MID` or `HIGH`.
    #[schema(example = "MID")]
    pub price: Option<String>,
    pub comment: Option<String>,
    pub image_base64: Option<String>,
    pub keep_existing_image: Option<bool>,
    #[schema(example = "2024-03-04")]
    pub visited_at: String,
}

struct ParsedVisit {
    details: VisitDetails,
    image: Option<Vec<u8>>,
    keep_existing_image: bool,
}

fn map_visit_validation_error(err: VisitValidationError) -> Error {
    let (field, code) = match err {
        VisitValidationError::BlankMenu => ("menu", "blank_menu"),
        VisitValidationError::RatingOutOfRange => ("rating", "rating_out_of_range"),
        VisitValidationError::RatingTooPrecise => ("rating", "rating_too_precise"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

impl VisitRequest {
    fn parse(self) -> Result<ParsedVisit, Error> {
        let rating = self
            .rating
            .map(Rating::from_f64)
            .transpose()
            .map_err(map_visit_validation_error)?;
        let price = parse_optional::<PriceTier>(self.price.as_deref(), PRICE_FIELD)?;
        let visited_at = parse_date(&self.visited_at, VISITED_AT_FIELD)?;
        let image = decode_base64(self.image_base64.as_deref(), IMAGE_FIELD)?;
        let details = VisitDetails::new(VisitDetailsDraft {
            menu: self.menu,
            rating,
            price,
            comment: self.comment,
            visited_at,
        })
        .map_err(map_visit_validation_error)?;
        Ok(ParsedVisit {
            details,
            image,
            keep_existing_image: self.keep_existing_image.unwrap_or(true),
        })
    }
}

fn parse_visit_id(raw: &str) -> Result<VisitId, Error> {
    parse_uuid(raw, VISIT_ID_FIELD).map(VisitId::from_uuid)
}

/// Record a visit authored by the session's identity.
#[utoipa::path(
    post,
    path = "/api/v1/restaurants/{id}/visits",
    params(("id" = String, Path, description = "Restaurant id")),
    request_body = VisitRequest,
    responses(
        (status = 201, description = "Created", body = VisitSummarySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Readonly identity", body = ErrorSchema),
        (status = 404, description = "No such restaurant", body = ErrorSchema)
    ),
    tags = ["visits"],
    operation_id = "createVisit"
)]
#[post("/restaurants/{id}/visits")]
pub async fn create_visit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<VisitRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.writer(&state.users)?;
    let restaurant_id = parse_restaurant_id(&path.into_inner())?;
    let parsed = payload.into_inner().parse()?;
    let visit = state
        .visits
        .create_visit(
            &caller,
            CreateVisitRequest {
                restaurant_id,
                details: parsed.details,
                image: parsed.image,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(visit))
}

/// Edit a visit; only its author may do so.
#[utoipa::path(
    put,
    path = "/api/v1/restaurants/{id}/visits/{visitId}",
    params(
        ("id" = String, Path, description = "Restaurant id"),
        ("visitId" = String, Path, description = "Visit id")
    ),
    request_body = VisitRequest,
    responses(
        (status = 200, description = "Updated", body = VisitSummarySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "No such visit", body = ErrorSchema)
    ),
    tags = ["visits"],
    operation_id = "updateVisit"
)]
#[put("/restaurants/{id}/visits/{visit_id}")]
pub async fn update_visit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<VisitRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.writer(&state.users)?;
    let (restaurant_id, visit_id) = path.into_inner();
    let restaurant_id = parse_restaurant_id(&restaurant_id)?;
    let visit_id = parse_visit_id(&visit_id)?;
    let parsed = payload.into_inner().parse()?;
    let visit = state
        .visits
        .update_visit(
            &caller,
            UpdateVisitRequest {
                restaurant_id,
                visit_id,
                details: parsed.details,
                image: ImageUpdate::resolve(parsed.image, parsed.keep_existing_image),
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(visit))
}

/// Delete a visit; only its author may do so.
#[utoipa::path(
    delete,
    path = "/api/v1/restaurants/{id}/visits/{visitId}",
    params(
        ("id" = String, Path, description = "Restaurant id"),
        ("visitId" = String, Path, description = "Visit id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "No such visit", body = ErrorSchema)
    ),
    tags = ["visits"],
    operation_id = "deleteVisit"
)]
#[delete("/restaurants/{id}/visits/{visit_id}")]
pub async fn delete_visit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let caller = session.writer(&state.users)?;
    let (restaurant_id, visit_id) = path.into_inner();
    let request = DeleteVisitRequest {
        restaurant_id: parse_restaurant_id(&restaurant_id)?,
        visit_id: parse_visit_id(&visit_id)?,
    };
    state.visits.delete_visit(&caller, request).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Raw image bytes for a visit.
#[utoipa::path(
    get,
    path = "/api/v1/visits/{visitId}/image",
    params(("visitId" = String, Path, description = "Visit id")),
    responses(
        (status = 200, description = "JPEG image", content_type = "image/jpeg", body = Vec<u8>,
            headers(("Cache-Control" = String, description = "public, max-age=31536000, immutable"))),
        (status = 404, description = "No such visit or no image", body = ErrorSchema)
    ),
    tags = ["visits"],
    operation_id = "getVisitImage"
)]
#[get("/visits/{visit_id}/image")]
pub async fn visit_image(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let visit_id = parse_visit_id(&path.into_inner())?;
    let bytes = state
        .visit_images
        .visit_image(&visit_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("no image for visit {visit_id}")))?;
    Ok(HttpResponse::Ok()
        .content_type("image/jpeg")
        .insert_header(public_immutable_header())
        .body(bytes))
}

#[cfg(test)]
#[path = "visits_tests.rs"]
mod tests;
