//! Todo record, create draft, and partial-update patch.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors for todo payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoValidationError {
    /// Text is missing or blank once trimmed.
    #[error("text must not be empty")]
    EmptyText,
    /// Identifier is not a valid UUID.
    #[error("todo id must be a valid UUID")]
    InvalidId,
}

/// Stable todo identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Generate a new random [`TodoId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Validate and parse an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, TodoValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| TodoValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted todo item, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Record identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: TodoId,
    /// Owning user; attached server-side, never taken from client input.
    #[schema(value_type = String, format = Uuid)]
    pub owner_id: UserId,
    /// Required item text.
    pub text: String,
    /// Completion flag, false on creation.
    pub completed: bool,
    /// Creation instant; lists order by this, newest first.
    pub created_at: DateTime<Utc>,
    /// Last modification instant, maintained by the store on update.
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Assemble a new record for `owner` with a generated id and timestamps.
    pub fn create(owner_id: UserId, draft: TodoDraft) -> Self {
        let now = Utc::now();
        Self {
            id: TodoId::random(),
            owner_id,
            text: draft.text,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated payload for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    text: String,
}

impl TodoDraft {
    /// Validate raw create inputs.
    pub fn try_new(text: &str) -> Result<Self, TodoValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(Self {
            text: text.to_owned(),
        })
    }
}

/// Partial update: absent fields stay untouched.
///
/// Patching only `completed` must not clear `text`, and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Validate raw patch inputs; present text must still be non-empty.
    pub fn try_new(
        text: Option<String>,
        completed: Option<bool>,
    ) -> Result<Self, TodoValidationError> {
        let text = match text {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(TodoValidationError::EmptyText);
                }
                Some(trimmed.to_owned())
            }
            None => None,
        };
        Ok(Self { text, completed })
    }

    /// True when no field is present; stores treat this as a no-op read.
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Apply the patch to an existing record in place, bumping `updated_at`.
    pub fn apply(&self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(text) = &self.text {
            todo.text.clone_from(text);
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_todo() -> Todo {
        Todo::create(
            UserId::random(),
            TodoDraft::try_new("water plants").expect("valid draft"),
        )
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn draft_rejects_blank_text(#[case] text: &str) {
        assert_eq!(
            TodoDraft::try_new(text),
            Err(TodoValidationError::EmptyText)
        );
    }

    #[rstest]
    fn new_todos_start_incomplete() {
        assert!(!sample_todo().completed);
    }

    #[rstest]
    fn patching_completed_keeps_text() {
        let mut todo = sample_todo();
        let patch = TodoPatch::try_new(None, Some(true)).expect("valid patch");
        patch.apply(&mut todo, Utc::now());
        assert_eq!(todo.text, "water plants");
        assert!(todo.completed);
    }

    #[rstest]
    fn patching_text_keeps_completed() {
        let mut todo = sample_todo();
        todo.completed = true;
        let patch = TodoPatch::try_new(Some("buy soil".into()), None).expect("valid patch");
        patch.apply(&mut todo, Utc::now());
        assert_eq!(todo.text, "buy soil");
        assert!(todo.completed);
    }

    #[rstest]
    fn apply_bumps_updated_at() {
        let mut todo = sample_todo();
        let later = todo.updated_at + chrono::Duration::seconds(5);
        TodoPatch::try_new(None, Some(true))
            .expect("valid patch")
            .apply(&mut todo, later);
        assert_eq!(todo.updated_at, later);
    }
}
