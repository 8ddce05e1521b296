//! Shared fixtures for handler tests: an app wired to in-memory stores.

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, test, web};
use serde_json::json;

use crate::auth::TokenService;
use crate::inbound::http::session::{CookiePolicy, TOKEN_COOKIE};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, notes, todos};

pub const TEST_SECRET: &[u8] = b"handler-test-secret";

/// App exposing every data endpoint over in-memory stores.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::in_memory()))
        .app_data(web::Data::new(TokenService::new(TEST_SECRET)))
        .app_data(web::Data::new(CookiePolicy::new(false)))
        .service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::check)
        .service(auth::me)
        .service(notes::list_notes)
        .service(notes::create_note)
        .service(notes::update_note)
        .service(notes::delete_note)
        .service(todos::list_todos)
        .service(todos::create_todo)
        .service(todos::update_todo)
        .service(todos::delete_todo)
}

/// Sign up and log in, returning the issued session cookie.
pub async fn login_cookie<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let signup = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(signup.status(), actix_web::http::StatusCode::CREATED);

    let login = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), actix_web::http::StatusCode::OK);

    login
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .expect("login sets session cookie")
        .into_owned()
}
