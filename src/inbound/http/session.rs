//! Session cookie policy and the authenticated-caller extractor.
//!
//! The cookie carries the signed token and nothing else. `CurrentUser` is
//! the single authorization step every data endpoint goes through: resolve
//! the caller's identity from the cookie before any store access, or fail
//! with a generic 401 that does not say why the token was rejected.

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::auth::{TOKEN_TTL_SECS, TokenService};
use crate::domain::{Error, Session, UserId};

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Cookie attributes that vary by environment.
///
/// Everything except the `Secure` flag is fixed: HTTP-only, whole-site path,
/// SameSite=Strict, max-age matching the token's seven-day expiry.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    secure: bool,
}

impl CookiePolicy {
    /// Build a policy; `secure` should be true everywhere except local dev.
    pub const fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Cookie set on login, carrying a freshly issued token.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        self.base_cookie(token)
            .max_age(Duration::seconds(TOKEN_TTL_SECS))
            .finish()
    }

    /// Already-expired replacement set on logout.
    ///
    /// Clearing the cookie is all logout does: the token itself stays valid
    /// until its natural expiry, since there is no server-side revocation.
    pub fn expired_cookie(&self) -> Cookie<'static> {
        self.base_cookie(String::new())
            .expires(OffsetDateTime::UNIX_EPOCH)
            .finish()
    }

    fn base_cookie(&self, value: String) -> actix_web::cookie::CookieBuilder<'static> {
        Cookie::build(TOKEN_COOKIE, value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
    }
}

/// Extractor resolving the acting user from the request's cookie.
///
/// Missing cookie, bad signature, and expired token all produce the same
/// 401 with the same message, so the client learns nothing about which
/// check failed.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(Session);

impl CurrentUser {
    /// Identifier of the verified caller.
    pub const fn user_id(&self) -> &UserId {
        self.0.user_id()
    }

    /// The verified session value.
    pub const fn session(&self) -> &Session {
        &self.0
    }
}

fn resolve(req: &HttpRequest) -> Result<CurrentUser, Error> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| Error::internal("token service not configured"))?;
    let cookie = req
        .cookie(TOKEN_COOKIE)
        .ok_or_else(|| Error::unauthorized("authentication required"))?;
    tokens
        .verify(cookie.value())
        .map(CurrentUser)
        .map_err(|_| Error::unauthorized("authentication required"))
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
