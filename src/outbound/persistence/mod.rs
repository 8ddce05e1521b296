//! PostgreSQL persistence adapters implementing the domain store ports.

pub mod diesel_credential_store;
pub mod diesel_note_store;
pub mod diesel_todo_store;
mod error_mapping;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_credential_store::DieselCredentialStore;
pub use diesel_note_store::DieselNoteStore;
pub use diesel_todo_store::DieselTodoStore;
pub use pool::{DbPool, PoolConfig, PoolError};
