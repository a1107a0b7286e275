//! Rule engine interface

use std::fmt;

use crate::schema::{FieldValue, Rule, RuleKind};

/// One field prepared for evaluation
#[derive(Debug, Clone, Copy)]
pub struct FieldCheck<'a> {
    pub field: &'a str,
    pub rules: &'a [Rule],
    pub value: FieldValue<'a>,
}

/// A failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub rule: RuleKind,
    pub param: Option<String>,
}

impl Violation {
    pub fn new(field: impl Into<String>, rule: &Rule) -> Self {
        Self {
            field: field.into(),
            rule: rule.kind.clone(),
            param: rule.param.clone(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "field '{}' failed '{}={}'", self.field, self.rule, param),
            None => write!(f, "field '{}' failed '{}'", self.field, self.rule),
        }
    }
}

/// Evaluates declarative rules against decoded field values.
///
/// Implementations must return violations in field order. Callers only ever
/// surface the first one.
pub trait RuleEngine: Send + Sync {
    /// Returns every violation found, in field order
    fn evaluate(&self, fields: &[FieldCheck<'_>]) -> Vec<Violation>;

    /// Whether this engine can evaluate `rule`
    fn supports(&self, _rule: &Rule) -> bool {
        true
    }
}
