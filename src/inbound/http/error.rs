//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn failures into consistent JSON responses and status codes. Internal
//! errors are redacted before leaving the process: clients only ever see a
//! stable code and a short message, never store or hashing detail.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::ports::StoreError;
use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        // The public contract pins duplicate-email signup to 400.
        ErrorCode::Conflict => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(err: &Error) -> Error {
    if matches!(err.code(), ErrorCode::InternalError) {
        Error::internal("internal server error")
    } else {
        err.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), "internal error surfaced to client");
        }
        HttpResponse::build(self.status_code()).json(redact_if_internal(self))
    }
}

/// Map store failures to domain errors.
///
/// Duplicates are mapped to a generic conflict here; handlers that know the
/// colliding field (signup) attach a friendlier message themselves.
pub fn map_store_error(err: StoreError) -> Error {
    match err {
        StoreError::Duplicate { .. } => Error::conflict("record already exists"),
        StoreError::Connection { message } | StoreError::Query { message } => {
            Error::internal(format!("store failure: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::conflict("dup"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("no"), StatusCode::UNAUTHORIZED)]
    #[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn codes_map_to_contract_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[actix_web::test]
    async fn internal_detail_is_redacted() {
        let response = Error::internal("connection refused to 10.0.0.5").error_response();
        let bytes = actix_web::body::to_bytes(response.into_body())
            .await
            .expect("read body");
        let value: Value = serde_json::from_slice(&bytes).expect("error payload");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("internal server error")
        );
    }

    #[rstest]
    fn store_failures_map_to_internal() {
        let error = map_store_error(StoreError::connection("refused"));
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn store_duplicates_map_to_conflict() {
        let error = map_store_error(StoreError::duplicate("email"));
        assert_eq!(error.code(), ErrorCode::Conflict);
    }
}
