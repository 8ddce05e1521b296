//! HTTP server assembly: application factory and listener construction.

pub mod config;

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenService;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session::CookiePolicy;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, notes, todos};
use crate::middleware::RouteGuard;
use crate::outbound::persistence::{
    DbPool, DieselCredentialStore, DieselNoteStore, DieselTodoStore,
};

pub use config::{AppConfig, ConfigError};

/// Everything `build_app` needs, cloned into each worker's factory closure.
#[derive(Clone)]
pub struct AppDependencies {
    pub health: web::Data<HealthState>,
    pub state: HttpState,
    pub tokens: TokenService,
    pub cookies: CookiePolicy,
    pub protected_prefix: String,
}

/// Assemble the actix application: shared data, the route guard, and every
/// endpoint. Tests call this directly with in-memory state.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health,
        state,
        tokens,
        cookies,
        protected_prefix,
    } = deps;

    let guard = RouteGuard::new(tokens.clone(), protected_prefix);

    let app = App::new()
        .app_data(health)
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(tokens))
        .app_data(web::Data::new(cookies))
        .wrap(guard)
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
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP listener over database-backed stores.
///
/// Marks `health` ready once the socket is bound; the returned [`Server`]
/// must be awaited to drive the listener.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health: web::Data<HealthState>,
    config: &AppConfig,
    pool: DbPool,
) -> std::io::Result<Server> {
    let state = HttpState::new(
        Arc::new(DieselCredentialStore::new(pool.clone())),
        Arc::new(DieselNoteStore::new(pool.clone())),
        Arc::new(DieselTodoStore::new(pool)),
    );
    let deps = AppDependencies {
        health: health.clone(),
        state,
        tokens: TokenService::new(config.token_secret.as_bytes()),
        cookies: CookiePolicy::new(config.cookie_secure),
        protected_prefix: config.protected_prefix.clone(),
    };

    let server = actix_web::HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health.mark_ready();
    Ok(server)
}
