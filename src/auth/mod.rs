//! Credential machinery: token signing/verification and password hashing.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{InvalidToken, TOKEN_TTL_SECS, TokenService};
