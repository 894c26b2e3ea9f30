//! Reception HTTP handlers.
//!
//! ```text
//! POST /receptions {"pvzId":1}
//! POST /pvz/1/close_last_reception
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::ReceptionBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    PVZ_ID, PvzIdInput, parse_pvz_id, parse_pvz_id_text, require,
};

/// Request body for `POST /receptions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartReceptionRequest {
    pub pvz_id: Option<PvzIdInput>,
}

/// Start a reception at a pickup point. Employees only.
#[utoipa::path(
    post,
    path = "/receptions",
    request_body = StartReceptionRequest,
    responses(
        (status = 201, description = "Reception started", body = ReceptionBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Employee role required", body = ErrorSchema),
        (status = 404, description = "Unknown pickup point", body = ErrorSchema),
        (status = 409, description = "A reception is already in progress", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["receptions"],
    operation_id = "startReception",
    security(("bearer_auth" = []))
)]
#[post("/receptions")]
pub async fn start_reception(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<StartReceptionRequest>,
) -> ApiResult<HttpResponse> {
    let pvz_id = parse_pvz_id(require(payload.into_inner().pvz_id, PVZ_ID)?)?;
    let reception = state.receptions.start(&caller.0, pvz_id).await?;
    Ok(HttpResponse::Created().json(ReceptionBody::from(&reception)))
}

/// Close the in-progress reception. Employees only.
#[utoipa::path(
    post,
    path = "/pvz/{pvzId}/close_last_reception",
    params(("pvzId" = i64, Path, description = "Pickup point identifier")),
    responses(
        (status = 200, description = "Reception closed", body = ReceptionBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Employee role required", body = ErrorSchema),
        (status = 404, description = "Unknown pickup point", body = ErrorSchema),
        (status = 409, description = "No reception in progress", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["receptions"],
    operation_id = "closeLastReception",
    security(("bearer_auth" = []))
)]
#[post("/pvz/{pvzId}/close_last_reception")]
pub async fn close_last_reception(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReceptionBody>> {
    let pvz_id = parse_pvz_id_text(&path.into_inner())?;
    let reception = state.receptions.close(&caller.0, pvz_id).await?;
    Ok(web::Json(ReceptionBody::from(&reception)))
}
