//! Violation messages
//!
//! Only the first violation of a request is ever shown to the client. The
//! wording depends on the failed rule; field names are lower-cased and rule
//! parameters are inserted as written in the annotation.

use crate::rules::Violation;
use crate::schema::RuleKind;

/// Turns rule violations into one client-facing sentence.
pub struct ErrorTranslator;

impl ErrorTranslator {
    /// Returns the message for the first violation, or `None` if there is none.
    pub fn translate(violations: &[Violation]) -> Option<String> {
        violations.first().map(Self::message_for)
    }

    /// Returns the message for a single violation.
    pub fn message_for(violation: &Violation) -> String {
        let field = violation.field.to_lowercase();
        let param = violation.param.as_deref().unwrap_or_default();

        match &violation.rule {
            RuleKind::Email => "Email format is invalid".to_string(),
            RuleKind::Min => format!("{} must be minimum {} characters", field, param),
            RuleKind::Max => format!("{} maximum allowed is {} characters", field, param),
            RuleKind::Required => format!("{} is required", field),
            RuleKind::Phone => "Phone number format is invalid".to_string(),
            RuleKind::OmitEmpty
            | RuleKind::Len
            | RuleKind::Numeric
            | RuleKind::Alphanum
            | RuleKind::OneOf
            | RuleKind::Custom(_) => format!("Invalid input for {}", field),
        }
    }
}
