//! Pickup point HTTP handlers.
//!
//! ```text
//! POST /pvz {"city":"Москва"}
//! GET /pvz?startDate=2025-04-01T00:00:00Z&endDate=2025-04-02T00:00:00Z&page=1&limit=10
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{PickupPointBody, PickupPointOverviewBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{CITY, parse_city, parse_page, parse_window, require};

/// Request body for `POST /pvz`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatePickupPointRequest {
    #[schema(example = "Москва")]
    pub city: Option<String>,
}

/// Query string for `GET /pvz`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPickupPointsQuery {
    /// Inclusive lower bound on reception start time (RFC 3339).
    pub start_date: Option<String>,
    /// Inclusive upper bound on reception start time (RFC 3339).
    pub end_date: Option<String>,
    /// 1-based page number.
    #[param(minimum = 1, default = 1)]
    pub page: Option<u32>,
    /// Page size.
    #[param(minimum = 1, maximum = 30, default = 10)]
    pub limit: Option<u32>,
}

/// Open a pickup point. Moderators only.
#[utoipa::path(
    post,
    path = "/pvz",
    request_body = CreatePickupPointRequest,
    responses(
        (status = 201, description = "Pickup point opened", body = PickupPointBody),
        (status = 400, description = "Unsupported city", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Moderator role required", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["pvz"],
    operation_id = "createPickupPoint",
    security(("bearer_auth" = []))
)]
#[post("/pvz")]
pub async fn create_pickup_point(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreatePickupPointRequest>,
) -> ApiResult<HttpResponse> {
    let city = parse_city(&require(payload.into_inner().city, CITY)?)?;
    let pickup_point = state.pickup_points.open(&caller.0, city).await?;
    Ok(HttpResponse::Created().json(PickupPointBody::from(&pickup_point)))
}

/// Page through pickup points with their receptions and items.
#[utoipa::path(
    get,
    path = "/pvz",
    params(ListPickupPointsQuery),
    responses(
        (status = 200, description = "Pickup point overview", body = [PickupPointOverviewBody]),
        (status = 400, description = "Invalid filter or page", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["pvz"],
    operation_id = "listPickupPoints",
    security(("bearer_auth" = []))
)]
#[get("/pvz")]
pub async fn list_pickup_points(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<ListPickupPointsQuery>,
) -> ApiResult<web::Json<Vec<PickupPointOverviewBody>>> {
    let ListPickupPointsQuery {
        start_date,
        end_date,
        page,
        limit,
    } = query.into_inner();
    let window = parse_window(start_date.as_deref(), end_date.as_deref())?;
    let page = parse_page(PageParams { page, limit })?;

    let overview = state
        .pickup_points
        .list_with_receptions(&caller.0, window, page)
        .await?;
    Ok(web::Json(
        overview.iter().map(PickupPointOverviewBody::from).collect(),
    ))
}

#[cfg(test)]
#[path = "pickup_points_tests.rs"]
mod tests;
