//! Statistics handler.

use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{ErrorSchema, ListingStatsSchema};
use crate::inbound::http::state::HttpState;

/// Counts, category breakdown and top lists over every listed restaurant.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Statistics", body = ListingStatsSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["restaurants"],
    operation_id = "listingStats"
)]
#[get("/stats")]
pub async fn listing_stats(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let stats = state.restaurants.listing_stats().await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(stats))
}
