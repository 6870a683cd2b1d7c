//! Validation and normalization of order input
//!
//! Untrusted JSON objects are turned into normalized drafts and patches.
//! Every violated field is reported, not just the first one. Create
//! validates all fields; update validates only the fields present.

pub mod filters;
pub mod validators;

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::field::FieldFormat;
use crate::core::order::{OrderDraft, OrderPatch, OrderStatus};
use serde_json::{Map, Value};

pub const NAME_MAX_CHARS: usize = 100;
pub const CITY_MAX_CHARS: usize = 50;
pub const NOTES_MAX_CHARS: usize = 500;
pub const MIN_COPIES: i64 = 1;
pub const MAX_COPIES: i64 = 100;

/// Validate a create request into a normalized draft
pub fn validate_create(input: &Value) -> Result<OrderDraft, ValidationError> {
    static NULL: Value = Value::Null;

    let object = as_object(input)?;
    let field = |key: &str| object.get(key).unwrap_or(&NULL);
    let mut report = Report::default();

    let name = report.check("name", name(field("name")));
    let email = report.check("email", email(field("email")));
    let mobile = report.check("mobile", mobile(field("mobile")));
    let copies = report.check("copies", copies(field("copies")));
    let city = report.check("city", city(field("city")));
    let status = report.check("status", status(field("status")));
    let notes = report.check("notes", notes(field("notes")));
    let order_value = report.check("orderValue", order_value(field("orderValue")));

    report.finish()?;

    // Every check passed, so each value is present.
    match (name, email, mobile, copies, city, status, notes, order_value) {
        (
            Some(name),
            Some(email),
            Some(mobile),
            Some(copies),
            Some(city),
            Some(status),
            Some(notes),
            Some(order_value),
        ) => Ok(OrderDraft {
            name,
            email,
            mobile,
            copies,
            city,
            status: status.unwrap_or_default(),
            notes,
            order_value,
        }),
        _ => Err(ValidationError::single("body", "Order could not be validated")),
    }
}

/// Validate an update request; only present fields are checked
pub fn validate_patch(input: &Value) -> Result<OrderPatch, ValidationError> {
    let object = as_object(input)?;
    let mut report = Report::default();
    let mut patch = OrderPatch::default();

    if let Some(value) = object.get("name") {
        patch.name = report.check("name", name(value));
    }
    if let Some(value) = object.get("email") {
        patch.email = report.check("email", email(value));
    }
    if let Some(value) = object.get("mobile") {
        patch.mobile = report.check("mobile", mobile(value));
    }
    if let Some(value) = object.get("copies") {
        patch.copies = report.check("copies", copies(value));
    }
    if let Some(value) = object.get("city") {
        patch.city = report.check("city", city(value));
    }
    if let Some(value) = object.get("status") {
        patch.status = report.check("status", status(value)).flatten();
    }
    if let Some(value) = object.get("notes") {
        patch.notes = report.check("notes", notes(value));
    }
    if let Some(value) = object.get("orderValue") {
        patch.order_value = report.check("orderValue", order_value(value)).flatten();
    }

    report.finish()?;
    Ok(patch)
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationError> {
    input
        .as_object()
        .ok_or_else(|| ValidationError::single("body", "Order must be a JSON object"))
}

/// Collects field failures across all checks
#[derive(Default)]
struct Report {
    errors: Vec<FieldValidationError>,
}

impl Report {
    fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(FieldValidationError::new(field, message));
                None
            }
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

// =============================================================================
// Field rules
// =============================================================================

fn labelled<T>(label: &str, result: Result<T, String>) -> Result<T, String> {
    result.map_err(|message| format!("{} {}", label, message))
}

fn name(value: &Value) -> Result<String, String> {
    let name = validators::required(
        "Name",
        labelled("Name", filters::text(value))?.map(filters::trim),
    )?;
    validators::max_chars(&name, NAME_MAX_CHARS, "Name cannot exceed 100 characters")?;
    Ok(name)
}

fn email(value: &Value) -> Result<String, String> {
    let email = validators::required(
        "Email",
        labelled("Email", filters::text(value))?
            .map(filters::trim)
            .map(filters::lowercase),
    )?;
    validators::format(&email, &FieldFormat::Email, "Please enter a valid email")?;
    Ok(email)
}

fn mobile(value: &Value) -> Result<String, String> {
    let mobile = validators::required(
        "Mobile number",
        labelled("Mobile number", filters::text(value))?.map(filters::trim),
    )?;
    validators::format(
        &mobile,
        &FieldFormat::Mobile,
        "Please enter a valid mobile number",
    )?;
    Ok(mobile)
}

fn copies(value: &Value) -> Result<u32, String> {
    let copies = labelled("Number of copies", filters::integer(value))?
        .ok_or_else(|| "Number of copies is required".to_string())?;
    validators::min_value(copies, MIN_COPIES, "At least 1 copy must be ordered")?;
    validators::max_value(copies, MAX_COPIES, "Cannot order more than 100 copies at once")?;
    u32::try_from(copies).map_err(|_| "Number of copies is out of range".to_string())
}

fn city(value: &Value) -> Result<String, String> {
    let city = validators::required(
        "City",
        labelled("City", filters::text(value))?.map(filters::trim),
    )?;
    validators::max_chars(&city, CITY_MAX_CHARS, "City name cannot exceed 50 characters")?;
    Ok(city)
}

/// `None` means "not given"; creation falls back to the default status
fn status(value: &Value) -> Result<Option<OrderStatus>, String> {
    match labelled("Status", filters::text(value))? {
        None => Ok(None),
        Some(raw) => validators::status(&filters::lowercase(filters::trim(raw))).map(Some),
    }
}

/// `None` means "no notes"
fn notes(value: &Value) -> Result<Option<String>, String> {
    let notes = labelled("Notes", filters::text(value))?;
    if let Some(notes) = &notes {
        validators::max_chars(notes, NOTES_MAX_CHARS, "Notes cannot exceed 500 characters")?;
    }
    Ok(notes)
}

/// `None` means "not given"; creation derives the value from copies
fn order_value(value: &Value) -> Result<Option<i64>, String> {
    let order_value = labelled("Order value", filters::integer(value))?;
    if let Some(v) = order_value {
        validators::min_value(v, 0, "Order value cannot be negative")?;
    }
    Ok(order_value)
}
