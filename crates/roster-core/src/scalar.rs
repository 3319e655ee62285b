//! # Scalar Predicates
//!
//! Pure classifiers over raw JSON values. Every integer field in both
//! rosters is read through [`as_strict_int`], and every numeric bounds field
//! through [`as_number`], so the boolean exclusion is applied uniformly.

use serde_json::Value;

/// Absolute tolerance for floating-point comparisons on house bounds.
pub const EPSILON: f64 = 1e-9;

/// Interpret a value as an integer, rejecting booleans and non-integral numbers.
pub fn as_strict_int(value: &Value) -> Option<i64> {
    match value {
        // A boolean is never an integer here, even where it would coerce to 0/1.
        Value::Bool(_) => None,
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Returns true if the value is an integer and not a boolean.
pub fn is_strict_int(value: &Value) -> bool {
    as_strict_int(value).is_some()
}

/// Interpret a value as a number (integer or float), rejecting booleans.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(_) => None,
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Epsilon-tolerant equality.
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// `value < bound`, tolerating representation noise.
pub fn below(value: f64, bound: f64) -> bool {
    value < bound - EPSILON
}

/// `value > bound`, tolerating representation noise.
pub fn above(value: f64, bound: f64) -> bool {
    value > bound + EPSILON
}

/// A string with non-whitespace content, returned trimmed.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    let trimmed = value?.as_str()?.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Name-shaped: after trimming, one or more ASCII letters and nothing else.
pub fn is_identifier(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// A single whitespace-free token after trimming.
pub fn is_single_token(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

/// Key used for case-insensitive uniqueness checks.
///
/// Upper-casing first applies the expanding mappings (`ß` to `SS`), so the
/// key matches full case folding for the scripts names are drawn from.
pub fn normalize_case(s: &str) -> String {
    s.trim().to_uppercase().to_lowercase()
}

/// Render an optional raw value for a message; absent values show as `null`.
pub fn describe(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}
