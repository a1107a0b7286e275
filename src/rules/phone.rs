//! Phone number rule
//!
//! Accepts Indonesian-style numbers: an optional `0`, `+62`, `062` or `62`
//! prefix followed by digits, 10 to 13 characters in total.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::FieldValue;

const MIN_LEN: usize = 10;
const MAX_LEN: usize = 13;

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(0|\+62|062|62)[0-9]+$").expect("phone pattern compiles"))
}

/// Returns whether `number` is a well-formed phone number.
pub fn is_valid_phone(number: &str) -> bool {
    if number.len() < MIN_LEN || number.len() > MAX_LEN {
        return false;
    }
    phone_pattern().is_match(number)
}

/// `phone` rule over a field value. Only strings can be phone numbers.
pub fn phone_rule(value: &FieldValue<'_>) -> bool {
    match value {
        FieldValue::Str(s) => is_valid_phone(s),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_table() {
        let cases = [
            ("0812345678", true),
            ("081234567", false),
            ("+6281234567890", false),
            ("62812345678", true),
            ("abc1234567", false),
        ];
        for (input, expected) in cases {
            assert_eq!(is_valid_phone(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_each_prefix_accepted() {
        assert!(is_valid_phone("08123456789"));
        assert!(is_valid_phone("+628123456789"));
        assert!(is_valid_phone("0628123456789"));
        assert!(is_valid_phone("628123456789"));
    }

    #[test]
    fn test_length_bounds_apply_regardless_of_prefix() {
        // 13 characters is the longest accepted
        assert!(is_valid_phone("+628123456789"));
        assert!(!is_valid_phone("+6281234567890"));
        assert!(!is_valid_phone("62123456"));
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        assert!(!is_valid_phone("1812345678"));
        assert!(!is_valid_phone("+1812345678"));
    }

    #[test]
    fn test_non_digit_body_rejected() {
        assert!(!is_valid_phone("0812-345-678"));
        assert!(!is_valid_phone("0812 345678"));
        assert!(!is_valid_phone("081234567a"));
    }

    #[test]
    fn test_rule_requires_string() {
        assert!(phone_rule(&FieldValue::Str("0812345678")));
        assert!(!phone_rule(&FieldValue::UInt(812345678)));
        assert!(!phone_rule(&FieldValue::Missing));
    }
}
