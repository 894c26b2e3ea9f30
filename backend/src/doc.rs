//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every PVZ handler, the DTOs they exchange, and the
//! bearer-JWT security scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::accounts::{
    AccountResponse, DummyLoginRequest, LoginRequest, RegisterRequest, TokenResponse,
};
use crate::inbound::http::dto::{
    ItemBody, PickupPointBody, PickupPointOverviewBody, ReceptionBody, ReceptionOverviewBody,
};
use crate::inbound::http::items::AddItemRequest;
use crate::inbound::http::pickup_points::CreatePickupPointRequest;
use crate::inbound::http::receptions::StartReceptionRequest;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::validation::PvzIdInput;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name under which the bearer scheme is registered.
pub const BEARER_SCHEME: &str = "bearer_auth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "HS256 token issued by POST /dummyLogin or POST /login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "PVZ backend API",
        description = "Pickup points, goods receptions, and the items logged against them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer_auth" = [])),
    paths(
        crate::inbound::http::accounts::dummy_login,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::pickup_points::create_pickup_point,
        crate::inbound::http::pickup_points::list_pickup_points,
        crate::inbound::http::receptions::start_reception,
        crate::inbound::http::receptions::close_last_reception,
        crate::inbound::http::items::add_item,
        crate::inbound::http::items::delete_last_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DummyLoginRequest,
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        AccountResponse,
        CreatePickupPointRequest,
        StartReceptionRequest,
        AddItemRequest,
        PvzIdInput,
        PickupPointBody,
        ReceptionBody,
        ItemBody,
        ReceptionOverviewBody,
        PickupPointOverviewBody,
    )),
    tags(
        (name = "accounts", description = "Registration and token issuance"),
        (name = "pvz", description = "Pickup point directory"),
        (name = "receptions", description = "Reception lifecycle"),
        (name = "items", description = "Item ledger"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
