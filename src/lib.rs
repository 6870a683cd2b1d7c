//! # Book Orders
//!
//! Record management and reporting for book orders, served over REST.
//!
//! ## Features
//!
//! - **Validation**: every violated field is reported at once, with
//!   normalized values (trimmed text, lower-cased email, coerced copies)
//! - **Derived pricing**: `orderValue = copies × 500` when not supplied
//! - **Querying**: case-insensitive search and city filter, any-field sort,
//!   deterministic pagination
//! - **Statistics**: totals, 7-day activity, top cities and monthly trends
//! - **CSV export**: the full order set, newest first
//! - **Pluggable storage**: in-memory (default) or MongoDB
//!   (`mongodb_backend` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookorders::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(AppConfig::default())
//!     .with_store(InMemoryOrderStore::new())
//!     .build()?;
//!
//! // Or use the service directly
//! let service = OrderService::new(Arc::new(InMemoryOrderStore::new()));
//! let order = service
//!     .create_order(&json!({
//!         "name": "Ayesha Khan",
//!         "email": "ayesha@example.com",
//!         "mobile": "03001234567",
//!         "copies": 3,
//!         "city": "Lahore",
//!     }))
//!     .await?;
//! assert_eq!(order.order_value, 1500);
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BookOrder, NewOrder, OrderDraft, OrderError, OrderFilter, OrderPage, OrderPatch,
        OrderQuery, OrderResult, OrderService, OrderSort, OrderStatistics, OrderStatus,
        OrderStore, PaginationMeta, SortField, SortOrder, StoreError, ValidationError,
    };

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoOrderStore;

    // === Config ===
    pub use crate::config::{AppConfig, ConfigError, StorageBackend};

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
