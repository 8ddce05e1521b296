//! Route guard gating the protected dashboard prefix.
//!
//! Runs once per request, before any handler. Requests outside the protected
//! prefix pass through untouched. Requests inside it must carry a token that
//! verifies; anything else — missing cookie, tampered or expired token — is
//! redirected to the home page. An invalid-but-present token never falls
//! through to the handler.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::auth::TokenService;
use crate::inbound::http::session::TOKEN_COOKIE;

/// Where denied requests are sent: the login/home page.
const REDIRECT_TARGET: &str = "/";

/// Terminal outcome of the per-request guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Request proceeds to the underlying handler, unmodified.
    Allowed,
    /// Request is redirected to the home page.
    Denied,
}

impl GuardDecision {
    /// Decide whether a request may proceed.
    ///
    /// Pure function of the path, the (optional) token, and the verifier;
    /// the middleware below only adds the HTTP plumbing around it.
    pub fn decide(
        tokens: &TokenService,
        protected_prefix: &str,
        path: &str,
        token: Option<&str>,
    ) -> Self {
        if !path.starts_with(protected_prefix) {
            return Self::Allowed;
        }
        match token {
            None => Self::Denied,
            Some(raw) => match tokens.verify(raw) {
                Ok(_) => Self::Allowed,
                Err(_) => Self::Denied,
            },
        }
    }
}

/// Middleware factory protecting a single path prefix.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use jotter::RouteGuard;
/// use jotter::auth::TokenService;
///
/// let tokens = TokenService::new(b"secret");
/// let app = App::new().wrap(RouteGuard::new(tokens, "/dashboard"));
/// ```
#[derive(Clone)]
pub struct RouteGuard {
    tokens: TokenService,
    protected_prefix: String,
}

impl RouteGuard {
    /// Guard every path under `protected_prefix` with `tokens`.
    pub fn new(tokens: TokenService, protected_prefix: impl Into<String>) -> Self {
        Self {
            tokens,
            protected_prefix: protected_prefix.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware {
            service,
            tokens: self.tokens.clone(),
            protected_prefix: self.protected_prefix.clone(),
        }))
    }
}

/// Service wrapper produced by [`RouteGuard`].
pub struct RouteGuardMiddleware<S> {
    service: S,
    tokens: TokenService,
    protected_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req.cookie(TOKEN_COOKIE);
        let decision = GuardDecision::decide(
            &self.tokens,
            &self.protected_prefix,
            req.path(),
            token.as_ref().map(|cookie| cookie.value()),
        );

        match decision {
            GuardDecision::Allowed => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            GuardDecision::Denied => {
                debug!(path = req.path(), "protected path denied, redirecting");
                let response = HttpResponse::Found()
                    .insert_header((header::LOCATION, REDIRECT_TARGET))
                    .finish()
                    .map_into_right_body();
                let res = req.into_response(response);
                Box::pin(ready(Ok(res)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    // Aliased so rstest's generated `#[test]` does not collide with the
    // actix attribute macro of the same name.
    use actix_web::test as actix_test;
    use actix_web::{App, web};
    use rstest::rstest;

    const PREFIX: &str = "/dashboard";

    fn tokens() -> TokenService {
        TokenService::new(b"guard-test-secret")
    }

    #[rstest]
    fn unprotected_paths_always_pass(#[values(None, Some("garbage"))] token: Option<&str>) {
        let decision = GuardDecision::decide(&tokens(), PREFIX, "/about", token);
        assert_eq!(decision, GuardDecision::Allowed);
    }

    #[rstest]
    fn protected_path_without_token_is_denied() {
        let decision = GuardDecision::decide(&tokens(), PREFIX, "/dashboard/notes", None);
        assert_eq!(decision, GuardDecision::Denied);
    }

    #[rstest]
    fn protected_path_with_invalid_token_is_denied() {
        let decision =
            GuardDecision::decide(&tokens(), PREFIX, "/dashboard/notes", Some("garbage"));
        assert_eq!(decision, GuardDecision::Denied);
    }

    #[rstest]
    fn protected_path_with_foreign_token_is_denied() {
        let foreign = TokenService::new(b"some-other-secret")
            .issue(&UserId::random())
            .expect("issue token");
        let decision = GuardDecision::decide(&tokens(), PREFIX, "/dashboard", Some(&foreign));
        assert_eq!(decision, GuardDecision::Denied);
    }

    #[rstest]
    fn protected_path_with_valid_token_is_allowed() {
        let service = tokens();
        let token = service.issue(&UserId::random()).expect("issue token");
        let decision = GuardDecision::decide(&service, PREFIX, "/dashboard", Some(&token));
        assert_eq!(decision, GuardDecision::Allowed);
    }

    fn guarded_app() -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<EitherBody<actix_web::body::BoxBody>>,
            Error = Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(RouteGuard::new(tokens(), PREFIX))
            .route(
                "/dashboard/notes",
                web::get().to(|| async { HttpResponse::Ok().body("notes page") }),
            )
            .route("/", web::get().to(|| async { HttpResponse::Ok().finish() }))
    }

    #[actix_web::test]
    async fn request_without_cookie_redirects_home() {
        let app = actix_test::init_service(guarded_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/dashboard/notes").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(b"/".as_slice())
        );
    }

    #[actix_web::test]
    async fn request_with_invalid_cookie_redirects_home() {
        let app = actix_test::init_service(guarded_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/dashboard/notes")
                .cookie(Cookie::new(TOKEN_COOKIE, "tampered"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn request_with_valid_cookie_proceeds() {
        let token = tokens().issue(&UserId::random()).expect("issue token");
        let app = actix_test::init_service(guarded_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/dashboard/notes")
                .cookie(Cookie::new(TOKEN_COOKIE, token))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn home_page_is_reachable_without_cookie() {
        let app = actix_test::init_service(guarded_app()).await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
