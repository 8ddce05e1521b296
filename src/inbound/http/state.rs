//! Shared HTTP adapter state.
//!
//! Handlers accept this bundle via `actix_web::web::Data`, so they only
//! depend on domain ports and stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::{
    CredentialStore, MemoryCredentialStore, MemoryNoteStore, MemoryTodoStore, NoteStore, TodoStore,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn CredentialStore>,
    pub notes: Arc<dyn NoteStore>,
    pub todos: Arc<dyn TodoStore>,
}

impl HttpState {
    /// Bundle concrete store implementations.
    pub fn new(
        users: Arc<dyn CredentialStore>,
        notes: Arc<dyn NoteStore>,
        todos: Arc<dyn TodoStore>,
    ) -> Self {
        Self {
            users,
            notes,
            todos,
        }
    }

    /// State backed entirely by in-memory stores; used by tests.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCredentialStore::default()),
            Arc::new(MemoryNoteStore::default()),
            Arc::new(MemoryTodoStore::default()),
        )
    }
}
