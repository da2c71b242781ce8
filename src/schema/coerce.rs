//! Loose scalar coercion for persisted JSON
//!
//! Older saves stored numbers as strings, flags as absent keys and so on.
//! These helpers read such values leniently; anything unusable comes back as
//! `None` and the caller picks the default.

use serde_json::Value;

/// Numeric value of a number or numeric string
pub fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Finite JSON number only; strings are not accepted
pub fn strict_number(value: Option<&Value>) -> Option<f64> {
    value?.as_f64().filter(|n| n.is_finite())
}

/// Positive finite number, accepting numeric strings
pub fn positive_number(value: Option<&Value>) -> Option<f64> {
    number(value).filter(|n| *n > 0.0)
}

/// Render a JSON number the way it reads: `120`, `12.5`
pub fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| format!("{}", f)).unwrap_or_default()
    }
}

/// Non-empty textual rendering of a truthy scalar.
///
/// Empty strings, zero, `false` and `null` are falsy and yield `None`.
pub fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(number_text(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// A string value, trimmed, if it is non-empty after trimming
pub fn trimmed_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// Stored identifier, if present and truthy
pub fn identifier(value: Option<&Value>) -> Option<String> {
    truthy_text(value)
}

/// Exact JSON boolean, if present
pub fn flag(value: Option<&Value>) -> Option<bool> {
    value?.as_bool()
}
