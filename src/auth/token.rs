//! Stateless session tokens.
//!
//! Tokens are HS256-signed, carry the owning user id plus issued-at and
//! expiry claims, and live for seven days. Verification is a pure function
//! of the secret and the input: nothing is persisted server-side, which also
//! means a token cannot be revoked before its natural expiry — logout only
//! clears the client's cookie. That limitation is deliberate and pinned by
//! tests rather than worked around.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Session, UserId};

/// Token lifetime: seven days, matching the session cookie's max-age.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Owning user id (UUID string).
    sub: String,
    /// Issued-at (Unix timestamp, seconds).
    iat: i64,
    /// Expiry (Unix timestamp, seconds).
    exp: i64,
}

/// Opaque verification failure.
///
/// Malformed input, a signature mismatch, and an expired token all collapse
/// into this one value; callers treat every case as "unauthenticated" and
/// must not tell the client which one occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid token")]
pub struct InvalidToken;

/// Issues and verifies signed session tokens.
///
/// Pure aside from reading the clock; the signing secret is injected once at
/// construction from startup configuration.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Build a service around the process-wide signing secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token is valid strictly before its expiry instant.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a token for `user_id` expiring [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, user_id: &UserId) -> Result<String, Error> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))
    }

    /// Check signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<Session, InvalidToken> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|_| InvalidToken)?;
        let user_id = UserId::parse(&data.claims.sub).map_err(|_| InvalidToken)?;
        let expires_at = DateTime::from_timestamp(data.claims.exp, 0).ok_or(InvalidToken)?;
        Ok(Session::new(user_id, expires_at))
    }
}
