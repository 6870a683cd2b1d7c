//! Typed errors returned by the order engine
//!
//! The engine never formats user-facing responses. It returns these errors
//! upward and the transport decides how to present them.
//!
//! # Error Categories
//!
//! - [`OrderError::Validation`]: one or more field constraints violated
//! - [`OrderError::NotFound`]: the addressed order does not exist
//! - [`OrderError::Constraint`]: a store-level constraint rejected the write
//! - [`OrderError::StoreUnavailable`]: the store could not be reached
//! - [`OrderError::Statistics`]: a statistics sub-aggregate failed
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get_order(&id).await {
//!     Ok(order) => println!("Found: {}", order.name),
//!     Err(OrderError::NotFound { id }) => println!("Order {} not found", id),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type of the order engine
#[derive(Debug, Error)]
pub enum OrderError {
    /// Field constraints violated on create or update
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No order with this id exists
    #[error("Book order with id '{id}' not found")]
    NotFound { id: Uuid },

    /// A store-level uniqueness or referential constraint was violated
    #[error("Constraint violated: {message}")]
    Constraint { message: String },

    /// The record store cannot be reached or timed out
    #[error("Storage backend '{backend}' is unavailable: {message}")]
    StoreUnavailable { backend: String, message: String },

    /// A statistics sub-aggregate failed; the whole report is rejected
    #[error("Failed to compute {aggregate}: {source}")]
    Statistics {
        aggregate: &'static str,
        source: Box<OrderError>,
    },

    /// Unexpected failure (corrupted stored data, driver errors)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrderError {
    /// Wrap a failure of one statistics sub-aggregate
    pub fn sub_aggregate(aggregate: &'static str, err: impl Into<OrderError>) -> Self {
        OrderError::Statistics {
            aggregate,
            source: Box::new(err.into()),
        }
    }

    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "VALIDATION_ERROR",
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::Constraint { .. } => "CONSTRAINT_VIOLATION",
            OrderError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            OrderError::Statistics { .. } => "STATISTICS_FAILED",
            OrderError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The innermost error, looking through statistics wrappers
    pub fn root(&self) -> &OrderError {
        match self {
            OrderError::Statistics { source, .. } => source.root(),
            other => other,
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field constraint violated by one input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation errors: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldValidationError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldValidationError>) -> Self {
        Self { errors }
    }

    /// Shortcut for a failure on one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldValidationError::new(field, message)])
    }

    /// Names of the failing fields, in input order
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn summarize(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A specialized Result type for order operations
pub type OrderResult<T> = Result<T, OrderError>;
