//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON envelopes and
//! status codes. Each [`ErrorCode`] maps to exactly one status, so the
//! client-side action for a failure is a fixed lookup.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::AuthRequired => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Replace internal error messages before they reach the wire.
///
/// Unexpected failures keep their detail in the logs; the client sees a
/// generic message plus the trace id for correlation.
fn redact_if_internal(err: &Error) -> Error {
    if matches!(err.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = err.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
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
            error!(
                code = ?self.code(),
                message = %self.message(),
                trace_id = ?TraceId::current(),
                "internal error surfaced to client"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        let trace_id = self
            .trace_id()
            .map(ToOwned::to_owned)
            .or_else(|| TraceId::current().map(|id| id.to_string()));
        if let Some(id) = trace_id {
            builder.insert_header((TRACE_ID_HEADER, id));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    //! Status mapping and redaction coverage.
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    #[rstest]
    #[case(Error::validation("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::auth_required("login"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("no"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("taken"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn every_code_maps_to_one_status(#[case] err: Error, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
    }

    #[tokio::test]
    async fn internal_messages_are_redacted() {
        let err = Error::internal("connection string was postgres://app:hunter2@db/app");
        let response = err.error_response();
        let body = to_bytes(response.into_body()).await.expect("body");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["error"], "Internal server error");
        assert_eq!(value["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn expected_failures_keep_their_message() {
        let err = Error::not_found("no such post");
        let response = err.error_response();
        let body = to_bytes(response.into_body()).await.expect("body");
        let value: Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(value["error"], "no such post");
        assert_eq!(value["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn carried_trace_id_becomes_a_header() {
        let err = Error::internal("boom").with_trace_id("0f1e2d3c");
        let response = err.error_response();
        let header = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok());
        assert_eq!(header, Some("0f1e2d3c"));
    }
}
