//! The book order entity and its input shapes

use crate::core::field::FieldValue;
use crate::core::query::SortField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fulfilment label attached to an order.
///
/// Any status may be replaced by any other through an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse an exact lower-case status label
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted book order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookOrder {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub copies: u32,
    pub city: String,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub order_value: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookOrder {
    /// Materialize a priced order with store-assigned identity and timestamps
    pub fn from_new(id: Uuid, order: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: order.name,
            email: order.email,
            mobile: order.mobile,
            copies: order.copies,
            city: order.city,
            status: order.status,
            notes: order.notes,
            order_value: order.order_value,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the fields present in a validated patch.
    ///
    /// Does not touch `updated_at`; callers pair this with [`BookOrder::touch`].
    pub fn apply_patch(&mut self, patch: OrderPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(mobile) = patch.mobile {
            self.mobile = mobile;
        }
        if let Some(copies) = patch.copies {
            self.copies = copies;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(order_value) = patch.order_value {
            self.order_value = order_value;
        }
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Dynamic field access for sorting
    pub fn field_value(&self, field: SortField) -> FieldValue {
        match field {
            SortField::Id => FieldValue::Uuid(self.id),
            SortField::Name => FieldValue::String(self.name.clone()),
            SortField::Email => FieldValue::String(self.email.clone()),
            SortField::Mobile => FieldValue::String(self.mobile.clone()),
            SortField::Copies => FieldValue::Integer(i64::from(self.copies)),
            SortField::City => FieldValue::String(self.city.clone()),
            SortField::Status => FieldValue::String(self.status.as_str().to_string()),
            SortField::Notes => self
                .notes
                .clone()
                .map(FieldValue::String)
                .unwrap_or(FieldValue::Null),
            SortField::OrderValue => FieldValue::Integer(self.order_value),
            SortField::CreatedAt => FieldValue::DateTime(self.created_at),
            SortField::UpdatedAt => FieldValue::DateTime(self.updated_at),
        }
    }
}

/// Normalized create input, before the order value is derived
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub copies: u32,
    pub city: String,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub order_value: Option<i64>,
}

/// A fully validated and priced order, ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub copies: u32,
    pub city: String,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub order_value: i64,
}

/// A validated partial update.
///
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub copies: Option<u32>,
    pub city: Option<String>,
    pub status: Option<OrderStatus>,
    pub notes: Option<Option<String>>,
    pub order_value: Option<i64>,
}

impl OrderPatch {
    /// True when the patch changes no field
    pub fn is_empty(&self) -> bool {
        self == &OrderPatch::default()
    }
}
