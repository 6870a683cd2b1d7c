//! Record store contract consumed by the order engine
//!
//! Implementations live in [`crate::storage`]. Each operation is assumed to
//! be atomic on its own; nothing here spans several operations.

use crate::core::error::OrderError;
use crate::core::order::{BookOrder, NewOrder, OrderPatch};
use crate::core::query::OrderSort;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id
    #[error("record '{id}' not found")]
    NotFound { id: Uuid },

    /// Uniqueness or referential constraint violated
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// The backend cannot be reached or timed out
    #[error("{backend} is unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },

    /// Any other backend failure
    #[error("{backend} error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => OrderError::NotFound { id },
            StoreError::Constraint(message) => OrderError::Constraint { message },
            StoreError::Unavailable { backend, message } => OrderError::StoreUnavailable {
                backend: backend.to_string(),
                message,
            },
            StoreError::Backend { backend, message } => {
                OrderError::Internal(format!("{backend}: {message}"))
            }
        }
    }
}

/// Filter predicate applied before sorting and paging.
///
/// All present conditions must hold. Text conditions are case-insensitive
/// substring matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    /// Matches name, email, city or mobile
    pub search: Option<String>,

    /// Matches city
    pub city: Option<String>,

    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `created_at`
    pub created_to: Option<DateTime<Utc>>,
}

impl OrderFilter {
    /// Matches every order
    pub fn all() -> Self {
        Self::default()
    }

    /// Orders created within `[from, to]`
    pub fn created_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            created_from: Some(from),
            created_to: Some(to),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Evaluate the predicate in memory
    pub fn matches(&self, order: &BookOrder) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [&order.name, &order.email, &order.city, &order.mobile]
                .into_iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(city) = &self.city
            && !order.city.to_lowercase().contains(&city.to_lowercase())
        {
            return false;
        }

        if self.created_from.is_some_and(|from| order.created_at < from) {
            return false;
        }

        if self.created_to.is_some_and(|to| order.created_at > to) {
            return false;
        }

        true
    }
}

/// Numeric fields that can be summed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Copies,
    OrderValue,
}

impl NumericField {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericField::Copies => "copies",
            NumericField::OrderValue => "orderValue",
        }
    }

    pub fn value_of(&self, order: &BookOrder) -> i64 {
        match self {
            NumericField::Copies => i64::from(order.copies),
            NumericField::OrderValue => order.order_value,
        }
    }
}

/// Grouping expressions supported by [`OrderStore::group_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Exact city value
    City,
    /// Calendar year and month of `created_at`, in UTC
    YearMonth,
}

impl GroupKey {
    pub fn key_of(&self, order: &BookOrder) -> GroupValue {
        match self {
            GroupKey::City => GroupValue::City(order.city.clone()),
            GroupKey::YearMonth => GroupValue::Month {
                year: order.created_at.year(),
                month: order.created_at.month(),
            },
        }
    }
}

/// A concrete group key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupValue {
    City(String),
    Month { year: i32, month: u32 },
}

/// One group produced by [`OrderStore::group_by`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderGroup {
    pub key: GroupValue,
    pub count: u64,
    pub sum: i64,
}

/// Durable persistence for book orders
///
/// The store assigns ids and timestamps. Ordering and limits of grouped
/// results are applied by the caller.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Short backend name used in errors and logs
    fn backend(&self) -> &'static str;

    /// Persist a new order, assigning its id and timestamps
    async fn insert(&self, order: NewOrder) -> Result<BookOrder, StoreError>;

    /// Fetch an order by id
    async fn find_by_id(&self, id: &Uuid) -> Result<BookOrder, StoreError>;

    /// Apply a patch and refresh `updated_at`
    async fn update_by_id(&self, id: &Uuid, patch: OrderPatch) -> Result<BookOrder, StoreError>;

    /// Permanently remove an order
    async fn delete_by_id(&self, id: &Uuid) -> Result<(), StoreError>;

    /// Filter, sort and page; returns the page and the total match count
    async fn query(
        &self,
        filter: &OrderFilter,
        sort: OrderSort,
        skip: usize,
        take: Option<usize>,
    ) -> Result<(Vec<BookOrder>, u64), StoreError>;

    /// Count every order
    async fn count_all(&self) -> Result<u64, StoreError>;

    /// Count orders matching a filter
    async fn count_where(&self, filter: &OrderFilter) -> Result<u64, StoreError>;

    /// Sum a numeric field over every order (0 when empty)
    async fn sum(&self, field: NumericField) -> Result<i64, StoreError>;

    /// Group every order by key, counting and summing `sum` per group
    async fn group_by(
        &self,
        key: GroupKey,
        sum: NumericField,
    ) -> Result<Vec<OrderGroup>, StoreError>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
