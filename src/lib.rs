//! Jotter: a cookie-authenticated notes and todos backend.
//!
//! The crate follows a hexagonal layout: `domain` holds the core types and
//! store ports, `inbound::http` the REST adapter, `outbound::persistence`
//! the Diesel adapters, and `server` wires them together.

pub mod auth;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::RouteGuard;
