//! Reusable field validators
//!
//! Each validator checks one constraint on an already filtered value and
//! returns the human-readable message on failure.

use crate::core::field::FieldFormat;
use crate::core::order::OrderStatus;

/// Validator: value is present and not blank
pub fn required(label: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("{} is required", label)),
    }
}

/// Validator: string has at most `max` characters
pub fn max_chars(value: &str, max: usize, message: &str) -> Result<(), String> {
    if value.chars().count() > max {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Validator: string matches a format
pub fn format(value: &str, format: &FieldFormat, message: &str) -> Result<(), String> {
    if format.is_match(value) {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

/// Validator: number is not below `min`
pub fn min_value(value: i64, min: i64, message: &str) -> Result<(), String> {
    if value < min {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Validator: number does not exceed `max`
pub fn max_value(value: i64, max: i64, message: &str) -> Result<(), String> {
    if value > max {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Validator: value is one of the order statuses
pub fn status(value: &str) -> Result<OrderStatus, String> {
    OrderStatus::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = OrderStatus::ALL.iter().map(OrderStatus::as_str).collect();
        format!(
            "`{}` is not a valid status (expected one of: {})",
            value,
            allowed.join(", ")
        )
    })
}
