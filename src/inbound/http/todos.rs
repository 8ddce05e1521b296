//! Todo endpoints.
//!
//! Same ownership rules as the note routes: the owner comes from the session
//! token and every per-record lookup filters by id AND owner.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, Todo, TodoDraft, TodoId, TodoPatch, TodoValidationError};
use crate::inbound::http::error::{ApiResult, map_store_error};
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /todos`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    pub text: String,
}

/// Body for `PATCH /todos/{id}`; absent fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

fn map_validation_error(error: TodoValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn parse_id(raw: &str) -> ApiResult<TodoId> {
    TodoId::parse(raw).map_err(map_validation_error)
}

/// List the caller's todos, newest first.
#[utoipa::path(
    get,
    path = "/todos",
    responses(
        (status = 200, description = "The caller's todos", body = [Todo]),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "todos"
)]
#[get("/todos")]
pub async fn list_todos(state: web::Data<HttpState>, user: CurrentUser) -> ApiResult<HttpResponse> {
    let todos = state
        .todos
        .list(user.user_id())
        .await
        .map_err(map_store_error)?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Create an open todo owned by the caller.
#[utoipa::path(
    post,
    path = "/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "The created todo", body = Todo),
        (status = 400, description = "Empty text", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "todos"
)]
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<HttpState>,
    user: CurrentUser,
    request: web::Json<CreateTodoRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TodoDraft::try_new(&request.text).map_err(map_validation_error)?;
    let todo = Todo::create(*user.user_id(), draft);
    state.todos.insert(&todo).await.map_err(map_store_error)?;
    Ok(HttpResponse::Created().json(todo))
}

/// Partially update one of the caller's todos.
#[utoipa::path(
    patch,
    path = "/todos/{id}",
    request_body = UpdateTodoRequest,
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The updated todo", body = Todo),
        (status = 400, description = "Malformed id or empty text", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such todo for this caller", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "todos"
)]
#[patch("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    request: web::Json<UpdateTodoRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let request = request.into_inner();
    let patch =
        TodoPatch::try_new(request.text, request.completed).map_err(map_validation_error)?;
    let updated = state
        .todos
        .update(user.user_id(), &id, &patch)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| Error::not_found("todo not found"))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete one of the caller's todos.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    params(("id" = String, Path, description = "Todo id")),
    responses(
        (status = 200, description = "Todo deleted"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such todo for this caller", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "todos"
)]
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let deleted = state
        .todos
        .delete(user.user_id(), &id)
        .await
        .map_err(map_store_error)?;
    if !deleted {
        return Err(Error::not_found("todo not found"));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "todo deleted" })))
}
