//! Row and changeset types bridging Diesel and the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Note, NoteId, Todo, TodoId, User, UserId};

use super::schema::{notes, todos, users};

/// Account row; insert and select share one shape.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_str().to_owned(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
        }
    }
}

/// Note row; insert and select share one shape.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NoteRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Note> for NoteRow {
    fn from(note: &Note) -> Self {
        Self {
            id: *note.id.as_uuid(),
            user_id: *note.owner_id.as_uuid(),
            title: note.title.clone(),
            content: note.content.clone(),
            created_at: note.created_at,
        }
    }
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: NoteId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.user_id),
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

/// Partial note update; `None` fields are left untouched by Diesel.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = notes)]
pub struct NoteChangeset<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
}

/// Todo row; insert and select share one shape.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TodoRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoRow {
    fn from(todo: &Todo) -> Self {
        Self {
            id: *todo.id.as_uuid(),
            user_id: *todo.owner_id.as_uuid(),
            text: todo.text.clone(),
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: TodoId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.user_id),
            text: row.text,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Partial todo update; always bumps `updated_at`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todos)]
pub struct TodoChangeset<'a> {
    pub text: Option<&'a str>,
    pub completed: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
