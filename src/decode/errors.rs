//! Decode error types

use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failures while turning a request body into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Body is not a JSON object; carries the parser's message verbatim
    #[error("{0}")]
    MalformedBody(String),

    /// A present key holds a value the field's type cannot take
    #[error("json: cannot decode key \"{key}\" into field {field}: {message}")]
    FieldTypeMismatch {
        field: String,
        key: String,
        message: String,
    },
}

impl DecodeError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::MalformedBody(_) => "GATE_MALFORMED_BODY",
            DecodeError::FieldTypeMismatch { .. } => "GATE_FIELD_TYPE_MISMATCH",
        }
    }

    /// Returns the offending field, if the failure is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeError::MalformedBody(_) => None,
            DecodeError::FieldTypeMismatch { field, .. } => Some(field.as_str()),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::MalformedBody(e.to_string())
    }
}
