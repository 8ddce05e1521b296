//! Note endpoints.
//!
//! Every route requires a session; the owner is taken from the token, never
//! from the request body. Updates and deletes filter by record id AND owner,
//! so a note belonging to someone else is indistinguishable from one that
//! does not exist.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
use crate::inbound::http::error::{ApiResult, map_store_error};
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /notes`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Body for `PATCH /notes/{id}`; absent fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

fn map_validation_error(error: NoteValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn parse_id(raw: &str) -> ApiResult<NoteId> {
    NoteId::parse(raw).map_err(map_validation_error)
}

/// List the caller's notes, newest first.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "The caller's notes", body = [Note]),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "notes"
)]
#[get("/notes")]
pub async fn list_notes(state: web::Data<HttpState>, user: CurrentUser) -> ApiResult<HttpResponse> {
    let notes = state
        .notes
        .list(user.user_id())
        .await
        .map_err(map_store_error)?;
    Ok(HttpResponse::Ok().json(notes))
}

/// Create a note owned by the caller.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "The created note", body = Note),
        (status = 400, description = "Empty title", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "notes"
)]
#[post("/notes")]
pub async fn create_note(
    state: web::Data<HttpState>,
    user: CurrentUser,
    request: web::Json<CreateNoteRequest>,
) -> ApiResult<HttpResponse> {
    let request = request.into_inner();
    let draft = NoteDraft::try_new(&request.title, request.content).map_err(map_validation_error)?;
    let note = Note::create(*user.user_id(), draft);
    state.notes.insert(&note).await.map_err(map_store_error)?;
    Ok(HttpResponse::Created().json(note))
}

/// Partially update one of the caller's notes.
#[utoipa::path(
    patch,
    path = "/notes/{id}",
    request_body = UpdateNoteRequest,
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "The updated note", body = Note),
        (status = 400, description = "Malformed id or empty title", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such note for this caller", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "notes"
)]
#[patch("/notes/{id}")]
pub async fn update_note(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    request: web::Json<UpdateNoteRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let request = request.into_inner();
    let patch = NotePatch::try_new(request.title, request.content).map_err(map_validation_error)?;
    let updated = state
        .notes
        .update(user.user_id(), &id, &patch)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| Error::not_found("note not found"))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete one of the caller's notes.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note deleted"),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "No such note for this caller", body = Error)
    ),
    security(("session_cookie" = [])),
    tag = "notes"
)]
#[delete("/notes/{id}")]
pub async fn delete_note(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let deleted = state
        .notes
        .delete(user.user_id(), &id)
        .await
        .map_err(map_store_error)?;
    if !deleted {
        return Err(Error::not_found("note not found"));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "note deleted" })))
}
