//! Shared test harness for order store testing
//!
//! Provides order fixtures and the `order_store_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod order_store_tests;

use bookorders::core::order::{BookOrder, NewOrder, OrderStatus};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid, already priced order
pub fn new_order(name: &str, city: &str, copies: u32) -> NewOrder {
    NewOrder {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        mobile: "03001234567".to_string(),
        copies,
        city: city.to_string(),
        status: OrderStatus::Pending,
        notes: None,
        order_value: i64::from(copies) * 500,
    }
}

/// A stored order with a fixed creation time, for seeding
pub fn order_at(name: &str, city: &str, copies: u32, created_at: DateTime<Utc>) -> BookOrder {
    BookOrder::from_new(Uuid::new_v4(), new_order(name, city, copies), created_at)
}

/// UTC timestamp at whole-second precision
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// The current time truncated to whole seconds, which every backend stores exactly
pub fn now_seconds() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).expect("valid timestamp")
}

/// A valid create request body
pub fn order_input(name: &str, city: &str, copies: u32) -> Value {
    json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "mobile": "03001234567",
        "copies": copies,
        "city": city,
    })
}
