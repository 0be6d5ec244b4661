//! Field checks and the value coercions they share with the handlers.
//!
//! Inputs are judged by their text form, so `50`, `"50"` and `50.0` are all
//! numeric, and an absent field reads as the empty string.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9]*)$").unwrap());
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").unwrap());
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap());

/// A single predicate a rule applies to one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Check {
    /// Integer text that fits a product id.
    IsInt,
    NotEmpty,
    IsNumeric,
    /// Numeric value strictly greater than zero.
    Positive,
    /// One of `true`, `false`, `1`, `0`.
    IsBoolean,
}

impl Check {
    pub fn passes(self, value: Option<&Value>) -> bool {
        match self {
            Check::IsInt => parse_id(&text(value)).is_some(),
            Check::NotEmpty => !text(value).is_empty(),
            Check::IsNumeric => NUMERIC.is_match(&text(value)),
            Check::Positive => {
                let n = coerce_number(value);
                n.is_finite() && n > 0.0
            }
            Check::IsBoolean => flag(value).is_some(),
        }
    }
}

/// Text form of a field. Absent and null read as `""`.
pub fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn parse_id(raw: &str) -> Option<i32> {
    if !INT.is_match(raw) {
        return None;
    }
    raw.parse().ok()
}

/// Loose numeric conversion: absent is NaN, null is zero, booleans are 0/1,
/// strings are parsed (blank is zero). Anything else is NaN.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else if DECIMAL.is_match(s) {
                s.parse().unwrap_or(f64::NAN)
            } else {
                f64::NAN
            }
        }
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

/// Boolean reading of a field, `None` when it is not boolean-like.
pub fn flag(value: Option<&Value>) -> Option<bool> {
    match text(value).as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_check_follows_integer_text_rules() {
        assert!(Check::IsInt.passes(Some(&json!("12"))));
        assert!(Check::IsInt.passes(Some(&json!("-3"))));
        assert!(!Check::IsInt.passes(Some(&json!("007"))));
        assert!(!Check::IsInt.passes(Some(&json!("not-valid-url"))));
        assert!(!Check::IsInt.passes(Some(&json!("1.5"))));
        assert!(!Check::IsInt.passes(Some(&json!("99999999999"))));
        assert!(!Check::IsInt.passes(None));
    }

    #[test]
    fn numeric_accepts_numbers_and_numeric_strings() {
        assert!(Check::IsNumeric.passes(Some(&json!(50))));
        assert!(Check::IsNumeric.passes(Some(&json!(12.75))));
        assert!(Check::IsNumeric.passes(Some(&json!("399"))));
        assert!(!Check::IsNumeric.passes(Some(&json!("Hola"))));
        assert!(!Check::IsNumeric.passes(Some(&json!(true))));
        assert!(!Check::IsNumeric.passes(None));
    }

    #[test]
    fn positive_uses_loose_numeric_conversion() {
        assert!(Check::Positive.passes(Some(&json!(0.01))));
        assert!(Check::Positive.passes(Some(&json!("250"))));
        assert!(!Check::Positive.passes(Some(&json!(0))));
        assert!(!Check::Positive.passes(Some(&json!(-4))));
        assert!(!Check::Positive.passes(Some(&json!("Hola"))));
        assert!(!Check::Positive.passes(Some(&Value::Null)));
        assert!(!Check::Positive.passes(None));
    }

    #[test]
    fn not_empty_reads_text_form() {
        assert!(Check::NotEmpty.passes(Some(&json!("Monitor"))));
        assert!(Check::NotEmpty.passes(Some(&json!(0))));
        assert!(!Check::NotEmpty.passes(Some(&json!(""))));
        assert!(!Check::NotEmpty.passes(Some(&Value::Null)));
        assert!(!Check::NotEmpty.passes(None));
    }

    #[test]
    fn flags() {
        assert_eq!(flag(Some(&json!(false))), Some(false));
        assert_eq!(flag(Some(&json!("true"))), Some(true));
        assert_eq!(flag(Some(&json!(1))), Some(true));
        assert_eq!(flag(Some(&json!("0"))), Some(false));
        assert_eq!(flag(Some(&json!("yes"))), None);
        assert_eq!(flag(None), None);
    }
}
