//! Transport-agnostic domain types and ports.

pub mod auth;
pub mod error;
pub mod note;
pub mod ports;
pub mod todo;
pub mod user;

pub use auth::{Credentials, CredentialsValidationError, Session};
pub use error::{Error, ErrorCode};
pub use note::{Note, NoteDraft, NoteId, NotePatch, NoteValidationError};
pub use todo::{Todo, TodoDraft, TodoId, TodoPatch, TodoValidationError};
pub use user::{EmailAddress, User, UserId, UserValidationError};
