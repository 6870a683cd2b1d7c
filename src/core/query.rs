//! Query parameters, sorting and pagination for order listings

use crate::core::order::BookOrder;
use crate::core::store::OrderFilter;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default number of orders per page
pub const DEFAULT_LIMIT: usize = 50;

/// Upper bound on orders per page
pub const MAX_LIMIT: usize = 200;

/// Query parameters for listing orders
///
/// Extracted from the URL query string. All parameters have defaults.
///
/// # Example
/// ```text
/// GET /api/book-orders?page=2&limit=10
/// GET /api/book-orders?search=khan&city=lahore
/// GET /api/book-orders?sortBy=copies&sortOrder=asc
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderQuery {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of orders per page
    pub limit: usize,

    /// Free text matched against name, email, city and mobile
    pub search: Option<String>,

    /// Text matched against city only
    pub city: Option<String>,

    /// Field to sort on; unknown names fall back to `createdAt`
    pub sort_by: Option<String>,

    /// `asc` or `desc`; anything else falls back to `desc`
    pub sort_order: Option<String>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            search: None,
            city: None,
            sort_by: None,
            sort_order: None,
        }
    }
}

impl OrderQuery {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// Number of matching orders to skip before the current page
    pub fn skip(&self) -> usize {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Combined search and city predicate
    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            search: non_blank(self.search.as_deref()),
            city: non_blank(self.city.as_deref()),
            ..OrderFilter::default()
        }
    }

    /// Resolved sort, applying the documented fallbacks
    pub fn sort(&self) -> OrderSort {
        OrderSort {
            field: self
                .sort_by
                .as_deref()
                .and_then(SortField::parse)
                .unwrap_or_default(),
            order: self
                .sort_order
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Order fields that listings can be sorted on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Email,
    Mobile,
    Copies,
    City,
    Status,
    Notes,
    OrderValue,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse a field name; accepts the camelCase wire names and snake_case aliases
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "id" | "_id" => Some(SortField::Id),
            "name" => Some(SortField::Name),
            "email" => Some(SortField::Email),
            "mobile" => Some(SortField::Mobile),
            "copies" => Some(SortField::Copies),
            "city" => Some(SortField::City),
            "status" => Some(SortField::Status),
            "notes" => Some(SortField::Notes),
            "orderValue" | "order_value" => Some(SortField::OrderValue),
            "createdAt" | "created_at" => Some(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    /// Wire/document field name
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Mobile => "mobile",
            SortField::Copies => "copies",
            SortField::City => "city",
            SortField::Status => "status",
            SortField::Notes => "notes",
            SortField::OrderValue => "orderValue",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Some(SortOrder::Asc),
            "desc" | "descending" | "-1" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A resolved sort: field plus direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl OrderSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Newest first, the default listing and export order
    pub fn newest_first() -> Self {
        Self::new(SortField::CreatedAt, SortOrder::Desc)
    }

    /// Compare two orders under this sort.
    ///
    /// Equal keys fall back to `created_at` ascending whatever the
    /// direction; orders that still tie keep their insertion order under a
    /// stable sort.
    pub fn compare(&self, a: &BookOrder, b: &BookOrder) -> Ordering {
        let ordering = a
            .field_value(self.field)
            .compare(&b.field_value(self.field));
        let ordering = match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.created_at.cmp(&b.created_at))
    }
}

/// A page of orders
#[derive(Debug, Serialize)]
pub struct OrderPage {
    /// The orders on this page
    pub orders: Vec<BookOrder>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Number of orders per page
    pub limit: usize,

    /// Total number of matching orders (independent of paging)
    pub total: u64,

    /// Total number of pages
    pub total_pages: u64,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: u64) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit as u64);

        Self {
            current_page: page,
            limit,
            total,
            total_pages,
            has_next: (page as u64) < total_pages,
            has_prev: page > 1,
        }
    }
}
