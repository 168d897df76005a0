//! # Numeric Input Parsing
//!
//! The one place where user- or agent-supplied text becomes a number.
//!
//! ## Fallback Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input                     parse_numeric_input(input, fallback)         │
//! │  ─────                     ────────────────────────────────────         │
//! │  "12"                      12.0                                         │
//! │  "  12.5 ft "              12.5      (unit suffix stripped)             │
//! │  "$1,200"                  1200.0    (currency sign, separators)        │
//! │  "30%"                     30.0                                         │
//! │  "-4"                      -4.0      (sign kept; range checks are       │
//! │                                       validation's job, not parsing's)  │
//! │  "", "abc", "NaN", "inf"   fallback                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result is always finite unless the fallback itself is not.

use serde_json::Value;

/// Unit suffixes accepted after a number. Longest first so "sqft" wins over "ft".
const UNIT_SUFFIXES: &[&str] = &["sqft", "feet", "foot", "ft", "mm", "%", "'"];

/// Parses a free-text numeric value, returning `fallback` when the text does
/// not hold a finite number.
///
/// ## Example
/// ```rust
/// use lumen_core::parse::parse_numeric_input;
///
/// assert_eq!(parse_numeric_input("$1,200", 0.0), 1200.0);
/// assert_eq!(parse_numeric_input("ten", 0.0), 0.0);
/// ```
pub fn parse_numeric_input(value: &str, fallback: f64) -> f64 {
    let mut text = value.trim().to_lowercase();

    for suffix in UNIT_SUFFIXES {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped.trim_end().to_string();
            break;
        }
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_' | ' '))
        .collect();

    match cleaned.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => fallback,
    }
}

/// Parses a JSON value (number, numeric string, or null) with the same rules.
///
/// Booleans, arrays and objects are not numbers and yield `fallback`.
pub fn parse_numeric_value(value: &Value, fallback: f64) -> f64 {
    match value {
        Value::Number(number) => number
            .as_f64()
            .filter(|parsed| parsed.is_finite())
            .unwrap_or(fallback),
        Value::String(text) => parse_numeric_input(text, fallback),
        _ => fallback,
    }
}

/// Like [`parse_numeric_value`] but keeps "absent" distinct from "zero".
///
/// Returns `None` for null, empty strings and unparseable text.
pub fn parse_optional_numeric(value: &Value) -> Option<f64> {
    let parsed = parse_numeric_value(value, f64::NAN);
    parsed.is_finite().then_some(parsed)
}

/// Parses a yes/no flag. Unknown values yield `fallback`.
pub fn parse_flag(value: &Value, fallback: bool) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(fallback),
        Value::String(text) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "required" => true,
            "false" | "no" | "n" | "0" | "none" | "" => false,
            _ => fallback,
        },
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_and_decorated_numbers() {
        assert_eq!(parse_numeric_input("12", 0.0), 12.0);
        assert_eq!(parse_numeric_input("  12.5 ft ", 0.0), 12.5);
        assert_eq!(parse_numeric_input("10'", 0.0), 10.0);
        assert_eq!(parse_numeric_input("$1,200", 0.0), 1200.0);
        assert_eq!(parse_numeric_input("30%", 0.0), 30.0);
        assert_eq!(parse_numeric_input("2.5mm", 0.0), 2.5);
        assert_eq!(parse_numeric_input("50 sqft", 0.0), 50.0);
        assert_eq!(parse_numeric_input("-4", 0.0), -4.0);
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(parse_numeric_input("", 7.0), 7.0);
        assert_eq!(parse_numeric_input("abc", 7.0), 7.0);
        assert_eq!(parse_numeric_input("NaN", 7.0), 7.0);
        assert_eq!(parse_numeric_input("inf", 7.0), 7.0);
        assert_eq!(parse_numeric_input("1e400", 7.0), 7.0);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(parse_numeric_value(&json!(10), 0.0), 10.0);
        assert_eq!(parse_numeric_value(&json!("5.5"), 0.0), 5.5);
        assert_eq!(parse_numeric_value(&Value::Null, 3.0), 3.0);
        assert_eq!(parse_numeric_value(&json!(true), 3.0), 3.0);
        assert_eq!(parse_numeric_value(&json!([1]), 3.0), 3.0);
    }

    #[test]
    fn test_optional_numeric_keeps_absence() {
        assert_eq!(parse_optional_numeric(&Value::Null), None);
        assert_eq!(parse_optional_numeric(&json!("")), None);
        assert_eq!(parse_optional_numeric(&json!("n/a")), None);
        assert_eq!(parse_optional_numeric(&json!(0)), Some(0.0));
        assert_eq!(parse_optional_numeric(&json!("3.9")), Some(3.9));
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag(&json!(true), false));
        assert!(parse_flag(&json!("Yes"), false));
        assert!(parse_flag(&json!(1), false));
        assert!(!parse_flag(&json!("no"), true));
        assert!(!parse_flag(&Value::Null, false));
        assert!(parse_flag(&json!("maybe"), true));
    }
}
