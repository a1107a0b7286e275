//! HTTP error responses
//!
//! Every error leaves the server as `{"error": <message>, "code": <status>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::gate::Rejection;
use crate::schema::SchemaError;

/// Errors produced by the HTTP binding
#[derive(Debug, Error)]
pub enum HttpError {
    /// The gate rejected the body
    #[error("{0}")]
    Rejected(Rejection),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to read request body")]
    BodyRead,

    /// No schema registered under the requested id
    #[error("{}", .0.message())]
    UnknownSchema(SchemaError),

    /// A handler ran without the validation middleware in front of it
    #[error("Validated payload missing from request")]
    MissingPayload,
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Rejected(rejection) => {
                StatusCode::from_u16(rejection.status_code()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            HttpError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            HttpError::BodyRead => StatusCode::BAD_REQUEST,
            HttpError::UnknownSchema(_) => StatusCode::NOT_FOUND,
            HttpError::MissingPayload => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Rejection> for HttpError {
    fn from(rejection: Rejection) -> Self {
        HttpError::Rejected(rejection)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<HttpError> for ErrorResponse {
    fn from(err: HttpError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::RejectReason;

    #[test]
    fn test_status_codes() {
        let rejected = HttpError::Rejected(Rejection::new(RejectReason::RuleViolation, "name is required"));
        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            HttpError::PayloadTooLarge { limit: 10 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            HttpError::UnknownSchema(SchemaError::unknown_schema("x")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HttpError::MissingPayload.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejection_envelope() {
        let err = HttpError::from(Rejection::new(RejectReason::RuleViolation, "Email format is invalid"));
        let body = serde_json::to_value(ErrorResponse::from(err)).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Email format is invalid", "code": 400}));
    }
}
