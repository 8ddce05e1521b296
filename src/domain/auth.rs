//! Authentication primitives: validated credentials and the session value.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler touches a store. A "session"
//! here is nothing more than the decoded, verified token; there is no
//! server-side session table.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::user::{EmailAddress, UserId, UserValidationError};

/// Domain error returned when signup/login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    #[error(transparent)]
    Email(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated signup/login credentials.
///
/// ## Invariants
/// - `email` is trimmed and shaped like an address.
/// - `password` is non-empty but otherwise kept verbatim, to avoid
///   surprising credential comparisons.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email suitable for account lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password exactly as provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never echo the password, even at debug level.
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Verified identity decoded from a session token.
///
/// Produced only by token verification; holding a `Session` means the
/// signature checked out and the expiry is in the future at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Assemble a session from verified token claims.
    pub const fn new(user_id: UserId, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            expires_at,
        }
    }

    /// Identifier of the owning user.
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Instant at which the backing token stops verifying.
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
