//! Rule annotations
//!
//! A field carries an annotation such as `required,min=8,max=64`: a
//! comma-separated list of `name` or `name=param` entries, evaluated in order.

use std::fmt;

/// Rule names understood by the annotation parser.
///
/// Anything not listed here parses as [`RuleKind::Custom`] and must be
/// registered with the rule engine before the schema is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Value must not be the zero value
    Required,
    /// Skip the remaining rules when the value is the zero value
    OmitEmpty,
    /// Lower bound (characters, numeric value or list length)
    Min,
    /// Upper bound (characters, numeric value or list length)
    Max,
    /// Exact length or value
    Len,
    /// Email address shape
    Email,
    /// Phone number shape
    Phone,
    /// Decimal number, possibly signed
    Numeric,
    /// ASCII letters and digits only
    Alphanum,
    /// One of a space-separated set
    OneOf,
    /// Rule provided by a registered predicate
    Custom(String),
}

impl RuleKind {
    /// Parses a rule name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Self {
        match name {
            "required" => RuleKind::Required,
            "omitempty" => RuleKind::OmitEmpty,
            "min" => RuleKind::Min,
            "max" => RuleKind::Max,
            "len" => RuleKind::Len,
            "email" => RuleKind::Email,
            "phone" => RuleKind::Phone,
            "numeric" => RuleKind::Numeric,
            "alphanum" => RuleKind::Alphanum,
            "oneof" => RuleKind::OneOf,
            other => RuleKind::Custom(other.to_string()),
        }
    }

    /// Returns the annotation name of the rule
    pub fn name(&self) -> &str {
        match self {
            RuleKind::Required => "required",
            RuleKind::OmitEmpty => "omitempty",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Len => "len",
            RuleKind::Email => "email",
            RuleKind::Phone => "phone",
            RuleKind::Numeric => "numeric",
            RuleKind::Alphanum => "alphanum",
            RuleKind::OneOf => "oneof",
            RuleKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single rule with its optional parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    pub param: Option<String>,
}

impl Rule {
    pub fn new(kind: RuleKind) -> Self {
        Self { kind, param: None }
    }

    pub fn with_param(kind: RuleKind, param: impl Into<String>) -> Self {
        Self {
            kind,
            param: Some(param.into()),
        }
    }

    /// Returns the parameter as a number, if it is one
    pub fn numeric_param(&self) -> Option<f64> {
        self.param
            .as_deref()
            .and_then(|p| p.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}={}", self.kind, param),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Parses a rule annotation into an ordered list of rules.
///
/// Returns a human-readable reason on failure; the caller attaches the
/// schema and field context.
pub fn parse_rules(annotation: &str) -> Result<Vec<Rule>, String> {
    let annotation = annotation.trim();
    if annotation.is_empty() {
        return Ok(Vec::new());
    }

    let mut rules = Vec::new();
    for entry in annotation.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(format!("empty rule in '{}'", annotation));
        }

        let (name, param) = match entry.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (entry, None),
        };
        if name.is_empty() {
            return Err(format!("rule without a name in '{}'", entry));
        }

        let kind = RuleKind::from_name(name);
        let rule = match (&kind, param) {
            (RuleKind::Min | RuleKind::Max | RuleKind::Len, Some(p)) => {
                if !p.parse::<f64>().map_or(false, f64::is_finite) {
                    return Err(format!("'{}' requires a numeric parameter, got '{}'", name, p));
                }
                Rule::with_param(kind.clone(), p)
            }
            (RuleKind::Min | RuleKind::Max | RuleKind::Len, None) => {
                return Err(format!("'{}' requires a parameter", name));
            }
            (RuleKind::OneOf, Some(p)) if !p.is_empty() => Rule::with_param(kind.clone(), p),
            (RuleKind::OneOf, _) => {
                return Err("'oneof' requires at least one allowed value".to_string());
            }
            (RuleKind::Custom(_), Some(p)) => Rule::with_param(kind.clone(), p),
            (RuleKind::Custom(_), None) => Rule::new(kind.clone()),
            (_, Some(_)) => {
                return Err(format!("'{}' does not take a parameter", name));
            }
            (_, None) => Rule::new(kind.clone()),
        };
        rules.push(rule);
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordered_rules() {
        let rules = parse_rules("required,min=8,max=64").unwrap();
        assert_eq!(
            rules,
            vec![
                Rule::new(RuleKind::Required),
                Rule::with_param(RuleKind::Min, "8"),
                Rule::with_param(RuleKind::Max, "64"),
            ]
        );
    }

    #[test]
    fn test_parse_empty_annotation() {
        assert!(parse_rules("").unwrap().is_empty());
        assert!(parse_rules("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_names_become_custom() {
        let rules = parse_rules("required,postcode").unwrap();
        assert_eq!(rules[1].kind, RuleKind::Custom("postcode".into()));
        assert_eq!(RuleKind::from_name("phone"), RuleKind::Phone);
    }

    #[test]
    fn test_bounds_need_numeric_param() {
        assert!(parse_rules("min").unwrap_err().contains("requires a parameter"));
        assert!(parse_rules("max=ten").unwrap_err().contains("numeric"));
    }

    #[test]
    fn test_bounds_must_be_finite() {
        assert!(parse_rules("min=NaN").is_err());
        assert!(parse_rules("max=inf").is_err());
        assert!(parse_rules("len=-inf").is_err());
        assert!(parse_rules("max=1.5").is_ok());
        assert_eq!(Rule::with_param(RuleKind::Min, "NaN").numeric_param(), None);
    }

    #[test]
    fn test_flag_rules_reject_params() {
        assert!(parse_rules("required=yes").is_err());
        assert!(parse_rules("email=strict").is_err());
    }

    #[test]
    fn test_oneof_keeps_space_separated_values() {
        let rules = parse_rules("oneof=red green blue").unwrap();
        assert_eq!(rules[0].param.as_deref(), Some("red green blue"));
        assert!(parse_rules("oneof=").is_err());
    }

    #[test]
    fn test_stray_commas_rejected() {
        assert!(parse_rules("required,,email").is_err());
        assert!(parse_rules("=3").is_err());
    }

    #[test]
    fn test_rule_display_round_trips_annotation() {
        assert_eq!(Rule::with_param(RuleKind::Min, "3").to_string(), "min=3");
        assert_eq!(Rule::new(RuleKind::Email).to_string(), "email");
    }
}
