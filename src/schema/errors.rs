//! Schema error types
//!
//! Error codes:
//! - GATE_INVALID_RULE (FATAL)
//! - GATE_UNSUPPORTED_RULE (FATAL)
//! - GATE_DUPLICATE_KEY (FATAL)
//! - GATE_DUPLICATE_SCHEMA (FATAL)
//! - GATE_MALFORMED_SCHEMA (FATAL)
//! - GATE_UNKNOWN_SCHEMA (REJECT)
//!
//! Everything except an unknown schema lookup is raised while the service is
//! starting up, before the first request is accepted.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// Startup must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Rule annotation could not be parsed
    GateInvalidRule,
    /// Rule engine has no implementation for a declared rule
    GateUnsupportedRule,
    /// Two fields of one schema map to the same JSON key
    GateDuplicateKey,
    /// Schema id registered twice
    GateDuplicateSchema,
    /// Schema file unreadable or structurally invalid
    GateMalformedSchema,
    /// Schema id not found at request time
    GateUnknownSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::GateInvalidRule => "GATE_INVALID_RULE",
            SchemaErrorCode::GateUnsupportedRule => "GATE_UNSUPPORTED_RULE",
            SchemaErrorCode::GateDuplicateKey => "GATE_DUPLICATE_KEY",
            SchemaErrorCode::GateDuplicateSchema => "GATE_DUPLICATE_SCHEMA",
            SchemaErrorCode::GateMalformedSchema => "GATE_MALFORMED_SCHEMA",
            SchemaErrorCode::GateUnknownSchema => "GATE_UNKNOWN_SCHEMA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::GateUnknownSchema => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    schema_id: Option<String>,
    field: Option<String>,
}

impl SchemaError {
    /// Create an invalid rule annotation error
    pub fn invalid_rule(
        schema_id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let id = schema_id.into();
        let field = field.into();
        Self {
            code: SchemaErrorCode::GateInvalidRule,
            message: format!(
                "Invalid rule on '{}.{}': {}",
                id,
                field,
                reason.into()
            ),
            schema_id: Some(id),
            field: Some(field),
        }
    }

    /// Create an unsupported rule error
    pub fn unsupported_rule(
        schema_id: impl Into<String>,
        field: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        let id = schema_id.into();
        let field = field.into();
        Self {
            code: SchemaErrorCode::GateUnsupportedRule,
            message: format!(
                "Rule '{}' on '{}.{}' is not registered with the rule engine",
                rule.into(),
                id,
                field
            ),
            schema_id: Some(id),
            field: Some(field),
        }
    }

    /// Create a duplicate JSON key error
    pub fn duplicate_key(schema_id: impl Into<String>, key: impl Into<String>) -> Self {
        let id = schema_id.into();
        let key = key.into();
        Self {
            code: SchemaErrorCode::GateDuplicateKey,
            message: format!("Schema '{}' maps JSON key '{}' more than once", id, key),
            schema_id: Some(id),
            field: Some(key),
        }
    }

    /// Create a duplicate schema error
    pub fn duplicate_schema(schema_id: impl Into<String>) -> Self {
        let id = schema_id.into();
        Self {
            code: SchemaErrorCode::GateDuplicateSchema,
            message: format!("Schema '{}' is already registered", id),
            schema_id: Some(id),
            field: None,
        }
    }

    /// Create an error for a malformed schema file
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::GateMalformedSchema,
            message: format!("Malformed schema file '{}': {}", path.into(), reason.into()),
            schema_id: None,
            field: None,
        }
    }

    /// Create an unknown schema error
    pub fn unknown_schema(schema_id: impl Into<String>) -> Self {
        let id = schema_id.into();
        Self {
            code: SchemaErrorCode::GateUnknownSchema,
            message: format!("Schema '{}' not found", id),
            schema_id: Some(id),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema ID if applicable
    pub fn schema_id(&self) -> Option<&str> {
        self.schema_id.as_deref()
    }

    /// Returns the offending field or key if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this error must abort startup
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
