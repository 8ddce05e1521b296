//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the specification served by Swagger UI in debug
//! builds. It registers every HTTP endpoint, the wire schemas, and the
//! session cookie security scheme.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Note, Todo};
use crate::inbound::http::auth::{CredentialsRequest, IdentityResponse};
use crate::inbound::http::notes::{CreateNoteRequest, UpdateNoteRequest};
use crate::inbound::http::todos::{CreateTodoRequest, UpdateTodoRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "Signed session token issued by POST /auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Jotter API",
        description = "Cookie-authenticated notes and todos backend."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::check,
        crate::inbound::http::auth::me,
        crate::inbound::http::notes::list_notes,
        crate::inbound::http::notes::create_note,
        crate::inbound::http::notes::update_note,
        crate::inbound::http::notes::delete_note,
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Note,
        Todo,
        CredentialsRequest,
        IdentityResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        CreateTodoRequest,
        UpdateTodoRequest,
    )),
    tags(
        (name = "auth", description = "Accounts and session lifecycle"),
        (name = "notes", description = "Per-user notes"),
        (name = "todos", description = "Per-user todos"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[rstest]
    #[case("/auth/signup")]
    #[case("/auth/login")]
    #[case("/notes")]
    #[case("/notes/{id}")]
    #[case("/todos/{id}")]
    #[case("/health/ready")]
    fn document_includes_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths.paths.contains_key(path),
            "missing path {path} in OpenAPI document"
        );
    }

    #[rstest]
    fn security_scheme_targets_the_token_cookie() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components registered");
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
