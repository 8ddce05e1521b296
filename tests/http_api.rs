//! End-to-end tests over the fully assembled application.
//!
//! These run the same factory `main` uses, swapping the Diesel stores for
//! in-memory ones, so they exercise the route guard, the session extractor,
//! and the handlers together.

use actix_web::body::{BoxBody, EitherBody, MessageBody};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, Error, test, web};
use serde_json::{Value, json};

use jotter::auth::TokenService;
use jotter::inbound::http::health::HealthState;
use jotter::inbound::http::session::{CookiePolicy, TOKEN_COOKIE};
use jotter::inbound::http::state::HttpState;
use jotter::server::{AppDependencies, build_app};

const SECRET: &[u8] = b"integration-test-secret";

fn app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = Error,
        InitError = (),
    >,
> {
    build_app(AppDependencies {
        health: web::Data::new(HealthState::new()),
        state: HttpState::in_memory(),
        tokens: TokenService::new(SECRET),
        cookies: CookiePolicy::new(false),
        protected_prefix: "/dashboard".to_owned(),
    })
}

async fn login_cookie<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let signup = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({ "email": email, "password": "hunter2" }))
            .to_request(),
    )
    .await;
    assert_eq!(signup.status(), StatusCode::CREATED);

    let login = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": email, "password": "hunter2" }))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    login
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .expect("login sets session cookie")
        .into_owned()
}

#[actix_web::test]
async fn signup_login_and_note_round_trip() {
    let app = test::init_service(app()).await;
    let cookie = login_cookie(&app, "ada@example.com").await;

    let empty = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/notes")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(empty.status(), StatusCode::OK);
    let empty: Value = test::read_body_json(empty).await;
    assert_eq!(empty, json!([]));

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/notes")
            .cookie(cookie.clone())
            .set_json(json!({ "title": "groceries", "content": "milk" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/notes")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["title"], "groceries");

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get().uri("/notes").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn users_cannot_see_or_touch_each_others_records() {
    let app = test::init_service(app()).await;
    let ada = login_cookie(&app, "ada@example.com").await;
    let eve = login_cookie(&app, "eve@example.com").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/notes")
            .cookie(ada.clone())
            .set_json(json!({ "title": "secret plans" }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let id = created["id"].as_str().expect("note id").to_owned();

    let eve_list = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/notes")
            .cookie(eve.clone())
            .to_request(),
    )
    .await;
    let eve_list: Value = test::read_body_json(eve_list).await;
    assert_eq!(eve_list, json!([]));

    let eve_patch = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/notes/{id}"))
            .cookie(eve)
            .set_json(json!({ "title": "stolen" }))
            .to_request(),
    )
    .await;
    assert_eq!(eve_patch.status(), StatusCode::NOT_FOUND);

    let ada_list = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/notes")
            .cookie(ada)
            .to_request(),
    )
    .await;
    let ada_list: Value = test::read_body_json(ada_list).await;
    assert_eq!(ada_list[0]["title"], "secret plans");
}

#[actix_web::test]
async fn todo_partial_updates_leave_other_fields_alone() {
    let app = test::init_service(app()).await;
    let cookie = login_cookie(&app, "ada@example.com").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/todos")
            .cookie(cookie.clone())
            .set_json(json!({ "text": "water plants" }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    assert_eq!(created["completed"], false);
    let id = created["id"].as_str().expect("todo id").to_owned();

    let completed = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/todos/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "completed": true }))
            .to_request(),
    )
    .await;
    let completed: Value = test::read_body_json(completed).await;
    assert_eq!(completed["text"], "water plants");
    assert_eq!(completed["completed"], true);

    let renamed = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/todos/{id}"))
            .cookie(cookie)
            .set_json(json!({ "text": "repot plants" }))
            .to_request(),
    )
    .await;
    let renamed: Value = test::read_body_json(renamed).await;
    assert_eq!(renamed["text"], "repot plants");
    assert_eq!(renamed["completed"], true);
}

#[actix_web::test]
async fn duplicate_signup_reports_a_conflict() {
    let app = test::init_service(app()).await;
    let body = json!({ "email": "ada@example.com", "password": "hunter2" });

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(second).await;
    assert_eq!(payload["code"], "conflict");
}

#[actix_web::test]
async fn protected_prefix_redirects_anonymous_requests() {
    let app = test::init_service(app()).await;

    let redirected = test::call_service(
        &app,
        test::TestRequest::get().uri("/dashboard/notes").to_request(),
    )
    .await;
    assert_eq!(redirected.status(), StatusCode::FOUND);
    assert_eq!(
        redirected
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/")
    );

    let open = test::call_service(
        &app,
        test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    assert_eq!(open.status(), StatusCode::OK);
}

#[actix_web::test]
async fn session_cookie_carries_the_agreed_attributes() {
    let app = test::init_service(app()).await;
    let cookie = login_cookie(&app, "ada@example.com").await;

    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(
        cookie.same_site(),
        Some(actix_web::cookie::SameSite::Strict)
    );
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::days(7))
    );
}

#[actix_web::test]
async fn logout_then_me_is_rejected_without_the_cookie() {
    let app = test::init_service(app()).await;
    let cookie = login_cookie(&app, "ada@example.com").await;

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let identity: Value = test::read_body_json(me).await;
    assert!(identity["userId"].is_string());

    let logout = test::call_service(
        &app,
        test::TestRequest::post().uri("/auth/logout").to_request(),
    )
    .await;
    let cleared = logout
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .expect("logout replaces the session cookie");
    assert!(cleared.value().is_empty());

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get().uri("/auth/me").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}
