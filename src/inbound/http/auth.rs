//! Account and session endpoints.
//!
//! Signup and login share one request shape. A successful login issues a
//! signed session token delivered as an HTTP-only cookie; logout replaces it
//! with an already-expired cookie. The token itself stays valid until its
//! `exp` claim passes, so `check` and `me` only prove possession of an
//! unexpired token.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::{TokenService, hash_password, verify_password};
use crate::domain::ports::StoreError;
use crate::domain::{Credentials, CredentialsValidationError, Error, User, UserId};
use crate::inbound::http::error::{ApiResult, map_store_error};
use crate::inbound::http::session::{CookiePolicy, CurrentUser};
use crate::inbound::http::state::HttpState;

/// Request body shared by signup and login.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(request: CredentialsRequest) -> Result<Self, Self::Error> {
        Credentials::try_from_parts(&request.email, &request.password)
    }
}

fn map_credentials_error(error: CredentialsValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Who the presented token belongs to, and when it lapses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Register a new account. Does not log the caller in.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid credentials or email already registered", body = Error)
    ),
    tag = "auth"
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    request: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(request.into_inner()).map_err(map_credentials_error)?;
    let password_hash = hash_password(credentials.password())
        .map_err(|_| Error::internal("password hashing failed"))?;
    let user = User::create(credentials.email().clone(), password_hash);
    state.users.insert(&user).await.map_err(|error| match error {
        StoreError::Duplicate { .. } => {
            Error::conflict("an account with this email already exists")
        }
        other => map_store_error(other),
    })?;
    Ok(HttpResponse::Created().json(json!({ "message": "account created" })))
}

/// Exchange credentials for a session cookie.
///
/// Wrong email and wrong password produce byte-identical responses.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session cookie issued"),
        (status = 400, description = "Invalid email or password", body = Error)
    ),
    tag = "auth"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    tokens: web::Data<TokenService>,
    cookies: web::Data<CookiePolicy>,
    request: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let rejection = || Error::invalid_request("invalid email or password");
    let credentials = Credentials::try_from(request.into_inner()).map_err(|_| rejection())?;
    let user = state
        .users
        .find_by_email(credentials.email())
        .await
        .map_err(map_store_error)?
        .ok_or_else(rejection)?;
    if !verify_password(credentials.password(), &user.password_hash) {
        return Err(rejection());
    }
    let token = tokens.issue(&user.id)?;
    Ok(HttpResponse::Ok()
        .cookie(cookies.session_cookie(token))
        .json(json!({ "message": "logged in" })))
}

/// Replace the session cookie with an expired one.
///
/// The token itself is not revoked; a captured copy stays valid until its
/// expiry passes.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Session cookie cleared")),
    tag = "auth"
)]
#[post("/auth/logout")]
pub async fn logout(cookies: web::Data<CookiePolicy>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cookies.expired_cookie())
        .json(json!({ "message": "logged out" }))
}

/// Confirm the presented token is valid.
#[utoipa::path(
    get,
    path = "/auth/check",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "auth"
)]
#[get("/auth/check")]
pub async fn check(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "authenticated" }))
}

/// Identify the caller from their session token.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Caller identity", body = IdentityResponse),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "auth"
)]
#[get("/auth/me")]
pub async fn me(user: CurrentUser) -> HttpResponse {
    let session = user.session();
    HttpResponse::Ok().json(IdentityResponse {
        user_id: *session.user_id(),
        expires_at: session.expires_at(),
    })
}
