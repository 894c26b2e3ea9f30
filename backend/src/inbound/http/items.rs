//! Item ledger HTTP handlers.
//!
//! ```text
//! POST /products {"type":"электроника","pvzId":1}
//! POST /pvz/1/delete_last_product
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::ItemBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ITEM_TYPE, PVZ_ID, PvzIdInput, parse_item_category, parse_pvz_id, parse_pvz_id_text, require,
};

/// Request body for `POST /products`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(rename = "type")]
    #[schema(example = "электроника")]
    pub item_type: Option<String>,
    pub pvz_id: Option<PvzIdInput>,
}

/// Log an item against the in-progress reception. Employees only.
#[utoipa::path(
    post,
    path = "/products",
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Item added", body = ItemBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Employee role required", body = ErrorSchema),
        (status = 404, description = "Unknown pickup point or no reception", body = ErrorSchema),
        (status = 409, description = "Reception already closed", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "addItem",
    security(("bearer_auth" = []))
)]
#[post("/products")]
pub async fn add_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<AddItemRequest>,
) -> ApiResult<HttpResponse> {
    let AddItemRequest { item_type, pvz_id } = payload.into_inner();
    let category = parse_item_category(&require(item_type, ITEM_TYPE)?)?;
    let pvz_id = parse_pvz_id(require(pvz_id, PVZ_ID)?)?;

    let item = state.items.add_item(&caller.0, category, pvz_id).await?;
    Ok(HttpResponse::Created().json(ItemBody::from(&item)))
}

/// Remove the most recently added item of the in-progress reception.
#[utoipa::path(
    post,
    path = "/pvz/{pvzId}/delete_last_product",
    params(("pvzId" = i64, Path, description = "Pickup point identifier")),
    responses(
        (status = 200, description = "Item removed; the removed item is returned", body = ItemBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Employee role required", body = ErrorSchema),
        (status = 404, description = "Unknown pickup point, no reception, or no items", body = ErrorSchema),
        (status = 409, description = "Reception already closed", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "deleteLastItem",
    security(("bearer_auth" = []))
)]
#[post("/pvz/{pvzId}/delete_last_product")]
pub async fn delete_last_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ItemBody>> {
    let pvz_id = parse_pvz_id_text(&path.into_inner())?;
    let item = state.items.remove_last_item(&caller.0, pvz_id).await?;
    Ok(web::Json(ItemBody::from(&item)))
}
