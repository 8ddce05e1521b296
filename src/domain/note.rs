//! Note record, create draft, and partial-update patch.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors for note payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteValidationError {
    /// Title is missing or blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Identifier is not a valid UUID.
    #[error("note id must be a valid UUID")]
    InvalidId,
}

/// Stable note identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a new random [`NoteId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Validate and parse an identifier from its string form.
    ///
    /// Handlers call this before touching the store so a malformed path
    /// segment surfaces as a validation failure, not a lookup miss.
    pub fn parse(raw: &str) -> Result<Self, NoteValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| NoteValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted note, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Record identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: NoteId,
    /// Owning user; attached server-side, never taken from client input.
    #[schema(value_type = String, format = Uuid)]
    pub owner_id: UserId,
    /// Required title.
    pub title: String,
    /// Optional free-form body.
    pub content: Option<String>,
    /// Creation instant; lists order by this, newest first.
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Assemble a new record for `owner` with a generated id and timestamp.
    pub fn create(owner_id: UserId, draft: NoteDraft) -> Self {
        Self {
            id: NoteId::random(),
            owner_id,
            title: draft.title,
            content: draft.content,
            created_at: Utc::now(),
        }
    }
}

/// Validated payload for creating a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    title: String,
    content: Option<String>,
}

impl NoteDraft {
    /// Validate raw create inputs.
    pub fn try_new(title: &str, content: Option<String>) -> Result<Self, NoteValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_owned(),
            content,
        })
    }
}

/// Partial update: absent fields stay untouched, they are never nulled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    /// Validate raw patch inputs; a present title must still be non-empty.
    pub fn try_new(
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Self, NoteValidationError> {
        let title = match title {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(NoteValidationError::EmptyTitle);
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };
        Ok(Self { title, content })
    }

    /// True when no field is present; stores treat this as a no-op read.
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Apply the patch to an existing record in place.
    pub fn apply(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            note.content = Some(content.clone());
        }
    }
}
