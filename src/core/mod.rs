//! Core module: the order entity, validation, querying and reporting

pub mod error;
pub mod export;
pub mod field;
pub mod order;
pub mod pricing;
pub mod query;
pub mod service;
pub mod stats;
pub mod store;
pub mod validation;

pub use error::{FieldValidationError, OrderError, OrderResult, ValidationError};
pub use field::{FieldFormat, FieldValue};
pub use order::{BookOrder, NewOrder, OrderDraft, OrderPatch, OrderStatus};
pub use query::{OrderPage, OrderQuery, OrderSort, PaginationMeta, SortField, SortOrder};
pub use service::OrderService;
pub use stats::{CityStat, MonthlyTrend, OrderStatistics};
pub use store::{
    GroupKey, GroupValue, NumericField, OrderFilter, OrderGroup, OrderStore, StoreError,
};
