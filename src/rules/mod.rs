//! Rule evaluation
//!
//! [`RuleEngine`] is the seam between the gate and whatever evaluates rule
//! annotations. [`RuleRegistry`] is the built-in implementation; it carries
//! the standard rules and any predicates registered at startup, including
//! the `phone` rule.

mod engine;
mod phone;
mod registry;

pub use engine::{FieldCheck, RuleEngine, Violation};
pub use phone::{is_valid_phone, phone_rule};
pub use registry::{RulePredicate, RuleRegistry};
