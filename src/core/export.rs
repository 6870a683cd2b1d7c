//! CSV export of the full order set

use crate::core::error::OrderResult;
use crate::core::order::BookOrder;
use crate::core::query::OrderSort;
use crate::core::store::{OrderFilter, OrderStore};
use chrono::{DateTime, Utc};

pub const CSV_HEADER: &str = "Name,Email,Mobile,Copies,City,Order Date";

/// Long English rendering of a timestamp in UTC, e.g. `March 5, 2025, 09:07 AM`
pub fn format_order_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y, %I:%M %p").to_string()
}

/// Double-quote a cell, doubling embedded quotes
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn order_row(order: &BookOrder) -> String {
    [
        quote(&order.name),
        quote(&order.email),
        quote(&order.mobile),
        order.copies.to_string(),
        quote(&order.city),
        quote(&format_order_date(&order.created_at)),
    ]
    .join(",")
}

/// Serialize orders in the given order; no trailing newline
pub fn write_csv(orders: &[BookOrder]) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(orders.iter().map(order_row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Export every order, newest first
pub async fn export_csv(store: &dyn OrderStore) -> OrderResult<String> {
    let (orders, _) = store
        .query(&OrderFilter::all(), OrderSort::newest_first(), 0, None)
        .await?;
    Ok(write_csv(&orders))
}
