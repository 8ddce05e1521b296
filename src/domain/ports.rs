//! Domain ports for persistence adapters.
//!
//! Ports describe how the domain expects to talk to driven adapters. Each
//! trait exposes a strongly typed error so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`. The in-memory
//! implementations at the bottom back the handler and integration tests.
//!
//! Every single-record operation takes the owning [`UserId`] alongside the
//! record id: the store must combine both in its lookup so a caller can never
//! reach another user's record, even with a guessed identifier.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::note::{Note, NoteId, NotePatch};
use super::todo::{Todo, TodoId, TodoPatch};
use super::user::{EmailAddress, User, UserId};

/// Errors surfaced by persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Database connectivity failure.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// Query construction or execution failure.
    #[error("store query failed: {message}")]
    Query { message: String },
    /// A uniqueness constraint was violated.
    #[error("duplicate record: {message}")]
    Duplicate { message: String },
}

impl StoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-record error with the given message.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }
}

/// Persisted user credentials, keyed by unique email.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new account. Fails with [`StoreError::Duplicate`] when the
    /// email is already registered.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    /// Look up an account by email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;
}

/// Per-user note collection.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All of `owner`'s notes, newest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Note>, StoreError>;

    /// Persist a freshly created note.
    async fn insert(&self, note: &Note) -> Result<(), StoreError>;

    /// Apply a partial update to the note matching `id` AND `owner`.
    /// Returns `None` when no such record exists for that owner.
    async fn update(
        &self,
        owner: &UserId,
        id: &NoteId,
        patch: &NotePatch,
    ) -> Result<Option<Note>, StoreError>;

    /// Delete the note matching `id` AND `owner`. Returns whether a record
    /// was removed.
    async fn delete(&self, owner: &UserId, id: &NoteId) -> Result<bool, StoreError>;
}

/// Per-user todo collection.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All of `owner`'s todos, newest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Todo>, StoreError>;

    /// Persist a freshly created todo.
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError>;

    /// Apply a partial update to the todo matching `id` AND `owner`,
    /// bumping its `updated_at`.
    async fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, StoreError>;

    /// Delete the todo matching `id` AND `owner`.
    async fn delete(&self, owner: &UserId, id: &TodoId) -> Result<bool, StoreError>;
}

/// In-memory [`CredentialStore`] used by tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.lock().map_err(|_| poisoned())?;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::duplicate("email already registered"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().map_err(|_| poisoned())?;
        Ok(users.iter().find(|user| &user.email == email).cloned())
    }
}

/// In-memory [`NoteStore`] used by tests.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<Vec<Note>>,
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list(&self, owner: &UserId) -> Result<Vec<Note>, StoreError> {
        let notes = self.notes.lock().map_err(|_| poisoned())?;
        // Insertion order follows creation order, so reversing yields
        // newest-first even when timestamps collide.
        Ok(notes
            .iter()
            .rev()
            .filter(|note| &note.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn insert(&self, note: &Note) -> Result<(), StoreError> {
        let mut notes = self.notes.lock().map_err(|_| poisoned())?;
        notes.push(note.clone());
        Ok(())
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &NoteId,
        patch: &NotePatch,
    ) -> Result<Option<Note>, StoreError> {
        let mut notes = self.notes.lock().map_err(|_| poisoned())?;
        let found = notes
            .iter_mut()
            .find(|note| &note.id == id && &note.owner_id == owner);
        Ok(found.map(|note| {
            patch.apply(note);
            note.clone()
        }))
    }

    async fn delete(&self, owner: &UserId, id: &NoteId) -> Result<bool, StoreError> {
        let mut notes = self.notes.lock().map_err(|_| poisoned())?;
        let before = notes.len();
        notes.retain(|note| !(&note.id == id && &note.owner_id == owner));
        Ok(notes.len() < before)
    }
}

/// In-memory [`TodoStore`] used by tests.
#[derive(Default)]
pub struct MemoryTodoStore {
    todos: Mutex<Vec<Todo>>,
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self, owner: &UserId) -> Result<Vec<Todo>, StoreError> {
        let todos = self.todos.lock().map_err(|_| poisoned())?;
        Ok(todos
            .iter()
            .rev()
            .filter(|todo| &todo.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        let mut todos = self.todos.lock().map_err(|_| poisoned())?;
        todos.push(todo.clone());
        Ok(())
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.lock().map_err(|_| poisoned())?;
        let found = todos
            .iter_mut()
            .find(|todo| &todo.id == id && &todo.owner_id == owner);
        Ok(found.map(|todo| {
            // An empty patch is a read; it must not bump `updated_at`.
            if !patch.is_empty() {
                patch.apply(todo, Utc::now());
            }
            todo.clone()
        }))
    }

    async fn delete(&self, owner: &UserId, id: &TodoId) -> Result<bool, StoreError> {
        let mut todos = self.todos.lock().map_err(|_| poisoned())?;
        let before = todos.len();
        todos.retain(|todo| !(&todo.id == id && &todo.owner_id == owner));
        Ok(todos.len() < before)
    }
}

fn poisoned() -> StoreError {
    StoreError::query("in-memory store lock poisoned")
}
