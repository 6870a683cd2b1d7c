//! Field value types and format checks

use chrono::{DateTime, Utc};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic field value used for dynamic sorting of orders
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Total ordering used by the query builder.
    ///
    /// `Null` sorts before every other value, matching how MongoDB orders
    /// missing fields. Values of different variants compare as equal so the
    /// caller's stable sort keeps their relative order.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Less,
            (_, FieldValue::Null) => Ordering::Greater,
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Text formats enforced on order contact fields
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    Mobile,
}

impl FieldFormat {
    /// Check a string against this format
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Mobile => Self::is_valid_mobile(value),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(
                r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$",
            )
            .unwrap()
        });
        regex.is_match(email)
    }

    fn is_valid_mobile(mobile: &str) -> bool {
        static MOBILE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = MOBILE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{10,15}$").unwrap());
        regex.is_match(mobile)
    }
}
