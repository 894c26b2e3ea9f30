//! Account HTTP handlers.
//!
//! ```text
//! POST /dummyLogin {"role":"moderator"}
//! POST /register {"email":"a@b.ru","password":"secret","role":"employee"}
//! POST /login {"email":"a@b.ru","password":"secret"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Account, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, PASSWORD, ROLE, map_account_validation_error, parse_role, require,
};

/// Request body for `POST /dummyLogin`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DummyLoginRequest {
    #[schema(example = "employee")]
    pub role: Option<String>,
}

/// Request body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "clerk@pvz.example")]
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(example = "employee")]
    pub role: Option<String>,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Bearer token issued by the login endpoints.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Registered account. The password hash is never returned.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    #[schema(example = "employee")]
    pub role: String,
}

impl From<Account> for AccountResponse {
    fn from(value: Account) -> Self {
        Self {
            id: value.id().get(),
            email: value.email().as_ref().to_owned(),
            role: value.role().as_str().to_owned(),
        }
    }
}

/// Issue a token for a synthetic principal with the requested role.
#[utoipa::path(
    post,
    path = "/dummyLogin",
    request_body = DummyLoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "dummyLogin",
    security([])
)]
#[post("/dummyLogin")]
pub async fn dummy_login(
    state: web::Data<HttpState>,
    payload: web::Json<DummyLoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let role = parse_role(&require(payload.into_inner().role, ROLE)?)?;
    let token = state.accounts.dummy_login(role).await?;
    Ok(web::Json(TokenResponse {
        token: token.into(),
    }))
}

/// Register an account.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        role,
    } = payload.into_inner();
    let email = require(email, EMAIL)?;
    let password = require(password, PASSWORD)?;
    let role = parse_role(&require(role, ROLE)?)?;
    let registration = Registration::try_from_parts(&email, &password, role)
        .map_err(map_account_validation_error)?;

    let account = state.accounts.register(&registration).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Exchange credentials for a token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let email = require(email, EMAIL)?;
    let password = require(password, PASSWORD)?;
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_account_validation_error)?;

    let token = state.accounts.login(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.into(),
    }))
}
