//! Validation gate
//!
//! Runs one request body through decode, rule evaluation and message
//! translation, in that order. Decode failures short-circuit: the rule engine
//! only ever sees fully decoded records.
//!
//! The gate is immutable once built and is shared across requests behind an
//! `Arc`. Nothing on the per-request path can take the process down; a panic
//! raised by a custom rule or accessor becomes a generic rejection.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::decode::{DecodeError, KeyedDecoder};
use crate::observability::{Event, Logger};
use crate::rules::{FieldCheck, RuleEngine, RuleRegistry};
use crate::schema::{SchemaDescriptor, SchemaError, SchemaResult};
use crate::translate::ErrorTranslator;

/// Message used when validation itself fails unexpectedly
pub const INTERNAL_MESSAGE: &str = "Invalid request payload";

/// Why a request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Body is not a JSON object
    MalformedBody,
    /// A present key could not be decoded into its field
    FieldTypeMismatch,
    /// A declared rule failed
    RuleViolation,
    /// Validation panicked
    Internal,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::MalformedBody => "GATE_MALFORMED_BODY",
            RejectReason::FieldTypeMismatch => "GATE_FIELD_TYPE_MISMATCH",
            RejectReason::RuleViolation => "GATE_RULE_VIOLATION",
            RejectReason::Internal => "GATE_INTERNAL",
        }
    }
}

/// A rejected request: one client-facing message plus its cause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: RejectReason,
    message: String,
}

impl Rejection {
    pub fn new(reason: RejectReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(RejectReason::Internal, INTERNAL_MESSAGE)
    }

    pub fn reason(&self) -> RejectReason {
        self.reason
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every rejection is a client error
    pub fn status_code(&self) -> u16 {
        400
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<DecodeError> for Rejection {
    fn from(err: DecodeError) -> Self {
        let reason = match err {
            DecodeError::MalformedBody(_) => RejectReason::MalformedBody,
            DecodeError::FieldTypeMismatch { .. } => RejectReason::FieldTypeMismatch,
        };
        Self::new(reason, err.to_string())
    }
}

/// Result of validating one request
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> ValidationOutcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            ValidationOutcome::Accepted(record) => Some(record),
            ValidationOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ValidationOutcome::Accepted(_) => None,
            ValidationOutcome::Rejected(rejection) => Some(rejection),
        }
    }

    pub fn into_result(self) -> Result<T, Rejection> {
        match self {
            ValidationOutcome::Accepted(record) => Ok(record),
            ValidationOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Orchestrates decode, rule evaluation and translation.
#[derive(Clone)]
pub struct ValidationGate {
    engine: Arc<dyn RuleEngine>,
}

impl ValidationGate {
    pub fn new(engine: Arc<dyn RuleEngine>) -> Self {
        Self { engine }
    }

    /// Gate backed by [`RuleRegistry::standard`]
    pub fn standard() -> Self {
        Self::new(Arc::new(RuleRegistry::standard()))
    }

    pub fn engine(&self) -> &Arc<dyn RuleEngine> {
        &self.engine
    }

    /// Checks at startup that the engine can evaluate every rule `schema`
    /// declares.
    pub fn prepare<T>(&self, schema: &SchemaDescriptor<T>) -> SchemaResult<()> {
        for field in schema.fields() {
            for rule in field.rule_list() {
                if !self.engine.supports(rule) {
                    return Err(SchemaError::unsupported_rule(
                        schema.schema_id(),
                        field.name(),
                        rule.kind.name(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Validates `body` against `schema`.
    pub fn validate_request<T: Default>(
        &self,
        body: &[u8],
        schema: &SchemaDescriptor<T>,
    ) -> ValidationOutcome<T> {
        self.validate_tagged(body, schema, None)
    }

    /// Like [`validate_request`](Self::validate_request), tagging log lines
    /// with `request_id`.
    pub fn validate_tagged<T: Default>(
        &self,
        body: &[u8],
        schema: &SchemaDescriptor<T>,
        request_id: Option<&str>,
    ) -> ValidationOutcome<T> {
        let schema_id = schema.schema_id();
        let request_id = request_id.unwrap_or("-");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(body, schema)));

        match outcome {
            Ok(Ok(record)) => {
                Logger::event(
                    Event::PayloadAccepted,
                    &[("request_id", request_id), ("schema", schema_id)],
                );
                ValidationOutcome::Accepted(record)
            }
            Ok(Err(rejection)) => {
                let event = match rejection.reason() {
                    RejectReason::RuleViolation => Event::RuleRejected,
                    _ => Event::DecodeRejected,
                };
                Logger::event(
                    event,
                    &[
                        ("code", rejection.reason().code()),
                        ("message", rejection.message()),
                        ("request_id", request_id),
                        ("schema", schema_id),
                    ],
                );
                ValidationOutcome::Rejected(rejection)
            }
            Err(payload) => {
                let detail = panic_detail(payload.as_ref());
                Logger::event(
                    Event::InternalFault,
                    &[
                        ("detail", detail.as_str()),
                        ("request_id", request_id),
                        ("schema", schema_id),
                    ],
                );
                ValidationOutcome::Rejected(Rejection::internal())
            }
        }
    }

    fn run<T: Default>(&self, body: &[u8], schema: &SchemaDescriptor<T>) -> Result<T, Rejection> {
        let record = KeyedDecoder::decode(body, schema)?;

        let checks: Vec<FieldCheck<'_>> = schema
            .fields()
            .iter()
            .map(|field| FieldCheck {
                field: field.name(),
                rules: field.rule_list(),
                value: field.value(&record),
            })
            .collect();

        let violations = self.engine.evaluate(&checks);

        match ErrorTranslator::translate(&violations) {
            Some(message) => Err(Rejection::new(RejectReason::RuleViolation, message)),
            None => Ok(record),
        }
    }
}

impl fmt::Debug for ValidationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationGate").finish_non_exhaustive()
    }
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
