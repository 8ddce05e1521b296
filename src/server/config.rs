//! Process configuration read from the environment.

use std::net::SocketAddr;

use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PROTECTED_PREFIX: &str = "/dashboard";

/// Failures while assembling [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable was absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    /// A variable was present but unparseable.
    #[error("invalid value for {name}: {message}")]
    InvalidVar { name: &'static str, message: String },
}

impl ConfigError {
    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidVar {
            name,
            message: message.into(),
        }
    }
}

/// Everything the process needs to start, resolved once at boot.
///
/// `TOKEN_SECRET` and `DATABASE_URL` are required; startup fails fast when
/// either is missing so a misconfigured deploy never serves traffic.
pub struct AppConfig {
    /// Secret used to sign and verify session tokens.
    pub token_secret: Zeroizing<String>,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Socket the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// Path prefix guarded by the session redirect middleware.
    pub protected_prefix: String,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Tests supply a map-backed closure instead of mutating the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token_secret = lookup("TOKEN_SECRET")
            .filter(|value| !value.is_empty())
            .map(Zeroizing::new)
            .ok_or(ConfigError::MissingVar("TOKEN_SECRET"))?;
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|err| ConfigError::invalid("BIND_ADDR", format!("{err}")))?;

        let cookie_secure = lookup("COOKIE_SECURE").is_none_or(|value| value != "0");

        let protected_prefix =
            lookup("PROTECTED_PREFIX").unwrap_or_else(|| DEFAULT_PROTECTED_PREFIX.into());
        if !protected_prefix.starts_with('/') {
            return Err(ConfigError::invalid(
                "PROTECTED_PREFIX",
                "must start with '/'",
            ));
        }

        Ok(Self {
            token_secret,
            database_url,
            bind_addr,
            cookie_secure,
            protected_prefix,
        })
    }
}
