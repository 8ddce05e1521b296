//! User account model.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for user identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier is not a valid UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Email is empty once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email does not look like `local@domain`.
    #[error("email must be a valid address")]
    InvalidEmail,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Validate and parse an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap_or_else(|err| panic!("email regex: {err}"))
    })
}

/// Validated, trimmed email address.
///
/// # Examples
/// ```
/// use jotter::domain::EmailAddress;
///
/// let email = EmailAddress::new(" a@x.com ").expect("valid email");
/// assert_eq!(email.as_str(), "a@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address from raw input.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Persisted user record.
///
/// Users are created by signup and only ever read afterwards; there is no
/// profile mutation or account deletion in this system.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a new record with a generated id and creation timestamp.
    pub fn create(email: EmailAddress, password_hash: String) -> Self {
        Self {
            id: UserId::random(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("not-an-email", UserValidationError::InvalidEmail)]
    #[case("a b@x.com", UserValidationError::InvalidEmail)]
    #[case("two@at@x.com", UserValidationError::InvalidEmail)]
    fn rejects_invalid_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        let err = EmailAddress::new(raw).expect_err("invalid email must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("a@x.com")]
    #[case("first.last@sub.example.org")]
    fn accepts_plausible_emails(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_str(), raw);
    }

    #[rstest]
    fn user_id_parse_round_trips() {
        let id = UserId::random();
        let parsed = UserId::parse(&id.to_string()).expect("parse id");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn user_id_parse_rejects_garbage() {
        assert_eq!(
            UserId::parse("not-a-uuid"),
            Err(UserValidationError::InvalidId)
        );
    }
}
