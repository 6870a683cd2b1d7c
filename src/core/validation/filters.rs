//! Reusable field filters
//!
//! These filters coerce and normalize raw input values before validation.
//! A JSON `null` is reported as `None` so callers can apply their own
//! required/optional rule.

use serde_json::Value;

/// Filter: read a text value; numbers are cast to their decimal string
pub fn text(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err("must be text".to_string()),
    }
}

/// Filter: read a whole number; numeric strings and integral floats are accepted
pub fn integer(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err("must be a whole number".to_string()),
                }
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .map(Some)
                .map_err(|_| "must be a whole number".to_string())
        }
        _ => Err("must be a whole number".to_string()),
    }
}

/// Filter: trim whitespace from string
pub fn trim(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Filter: convert string to lowercase
pub fn lowercase(value: String) -> String {
    value.to_lowercase()
}
