//! Built-in rule engine
//!
//! Evaluation semantics:
//! - Fields are evaluated in declaration order
//! - Rules of one field run in annotation order; the first failure ends the
//!   field, so each field contributes at most one violation
//! - `omitempty` skips the rest of the field when the value is zero
//! - A missing optional value fails every rule except `omitempty`
//! - `min`, `max` and `len` count characters for strings, compare values for
//!   numbers and count elements for lists
//! - `phone` and any other non built-in rule must be registered as a
//!   predicate before a schema using it is accepted

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::schema::{FieldValue, Rule, RuleKind, SchemaError, SchemaResult};

use super::engine::{FieldCheck, RuleEngine, Violation};
use super::phone::phone_rule;

/// Predicate backing a registered rule. Receives the field value and the
/// rule parameter, if any.
pub type RulePredicate = Arc<dyn Fn(&FieldValue<'_>, Option<&str>) -> bool + Send + Sync>;

// Dot-separated atoms before the `@`, at least two labels after it.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email pattern compiles")
    })
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").expect("numeric pattern compiles"))
}

/// Rule engine with the built-in rules plus registered predicates.
///
/// Constructed once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    custom: HashMap<String, RulePredicate>,
}

impl RuleRegistry {
    /// Registry with built-in rules only
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with built-in rules and `phone`
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.custom.insert(
            RuleKind::Phone.name().to_string(),
            Arc::new(phone_predicate),
        );
        registry
    }

    /// Registers a predicate under `name`.
    ///
    /// Built-in rule names cannot be replaced.
    pub fn register<F>(&mut self, name: &str, predicate: F) -> SchemaResult<()>
    where
        F: Fn(&FieldValue<'_>, Option<&str>) -> bool + Send + Sync + 'static,
    {
        if is_builtin(&RuleKind::from_name(name)) {
            return Err(SchemaError::invalid_rule(
                "<registry>",
                name,
                "built-in rules cannot be replaced",
            ));
        }
        self.custom.insert(name.to_string(), Arc::new(predicate));
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_rule<F>(mut self, name: &str, predicate: F) -> SchemaResult<Self>
    where
        F: Fn(&FieldValue<'_>, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.register(name, predicate)?;
        Ok(self)
    }

    /// Names of the registered predicates
    pub fn custom_rules(&self) -> impl Iterator<Item = &str> {
        self.custom.keys().map(String::as_str)
    }

    fn passes(&self, rule: &Rule, value: &FieldValue<'_>) -> bool {
        if *value == FieldValue::Missing {
            return false;
        }

        match &rule.kind {
            RuleKind::Required => !value.is_zero(),
            RuleKind::OmitEmpty => true,
            RuleKind::Min => compare(value, rule, |actual, bound| actual >= bound),
            RuleKind::Max => compare(value, rule, |actual, bound| actual <= bound),
            RuleKind::Len => compare(value, rule, |actual, bound| actual == bound),
            RuleKind::Email => match value {
                FieldValue::Str(s) => email_pattern().is_match(s),
                _ => false,
            },
            RuleKind::Numeric => match value {
                FieldValue::Str(s) => numeric_pattern().is_match(s),
                FieldValue::Int(_) | FieldValue::UInt(_) | FieldValue::Float(_) => true,
                _ => false,
            },
            RuleKind::Alphanum => match value {
                FieldValue::Str(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()),
                _ => false,
            },
            RuleKind::OneOf => {
                let rendered = match value {
                    FieldValue::Str(s) => s.to_string(),
                    FieldValue::Int(n) => n.to_string(),
                    FieldValue::UInt(n) => n.to_string(),
                    _ => return false,
                };
                rule.param
                    .as_deref()
                    .map_or(false, |allowed| allowed.split_whitespace().any(|a| a == rendered))
            }
            RuleKind::Phone | RuleKind::Custom(_) => match self.custom.get(rule.kind.name()) {
                Some(predicate) => predicate(value, rule.param.as_deref()),
                None => false,
            },
        }
    }
}

impl RuleEngine for RuleRegistry {
    fn evaluate(&self, fields: &[FieldCheck<'_>]) -> Vec<Violation> {
        let mut violations = Vec::new();

        for check in fields {
            for rule in check.rules {
                if rule.kind == RuleKind::OmitEmpty {
                    if check.value.is_zero() {
                        break;
                    }
                    continue;
                }
                if !self.passes(rule, &check.value) {
                    violations.push(Violation::new(check.field, rule));
                    break;
                }
            }
        }

        violations
    }

    fn supports(&self, rule: &Rule) -> bool {
        is_builtin(&rule.kind) || self.custom.contains_key(rule.kind.name())
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.custom_rules().collect();
        names.sort_unstable();
        f.debug_struct("RuleRegistry").field("custom", &names).finish()
    }
}

fn phone_predicate(value: &FieldValue<'_>, _param: Option<&str>) -> bool {
    phone_rule(value)
}

fn is_builtin(kind: &RuleKind) -> bool {
    !matches!(kind, RuleKind::Phone | RuleKind::Custom(_))
}

/// Size of a value for bound checks
fn measure(value: &FieldValue<'_>) -> Option<f64> {
    match value {
        FieldValue::Str(s) => Some(s.chars().count() as f64),
        FieldValue::Int(n) => Some(*n as f64),
        FieldValue::UInt(n) => Some(*n as f64),
        FieldValue::Float(n) => Some(*n),
        FieldValue::List(len) => Some(*len as f64),
        FieldValue::Bool(_) | FieldValue::Missing => None,
    }
}

fn compare(value: &FieldValue<'_>, rule: &Rule, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (measure(value), rule.numeric_param()) {
        (Some(actual), Some(bound)) => cmp(actual, bound),
        _ => false,
    }
}
