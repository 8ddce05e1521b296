//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod notes;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod todos;

pub use error::ApiResult;
