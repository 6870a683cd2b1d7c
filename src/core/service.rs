//! The order service: the operations offered to transports

use crate::core::error::OrderResult;
use crate::core::export;
use crate::core::order::BookOrder;
use crate::core::pricing;
use crate::core::query::{OrderPage, OrderQuery, PaginationMeta};
use crate::core::stats::{self, OrderStatistics};
use crate::core::store::OrderStore;
use crate::core::validation;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Record management and reporting over a single [`OrderStore`]
///
/// Stateless apart from the store handle, so clones are cheap and can be
/// shared across request handlers.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// Validate, price and persist a new order
    pub async fn create_order(&self, input: &Value) -> OrderResult<BookOrder> {
        let draft = validation::validate_create(input)?;
        let order = self.store.insert(pricing::price(draft)).await?;
        Ok(order)
    }

    /// Filter, sort and page the order set
    pub async fn list_orders(&self, query: &OrderQuery) -> OrderResult<OrderPage> {
        let (page, limit) = (query.page(), query.limit());
        let (orders, total) = self
            .store
            .query(&query.filter(), query.sort(), query.skip(), Some(limit))
            .await?;

        Ok(OrderPage {
            orders,
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    pub async fn get_order(&self, id: &Uuid) -> OrderResult<BookOrder> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Validate the present fields and apply them.
    ///
    /// The order value is only changed when the input carries one.
    pub async fn update_order(&self, id: &Uuid, input: &Value) -> OrderResult<BookOrder> {
        let patch = validation::validate_patch(input)?;
        Ok(self.store.update_by_id(id, patch).await?)
    }

    pub async fn delete_order(&self, id: &Uuid) -> OrderResult<()> {
        Ok(self.store.delete_by_id(id).await?)
    }

    pub async fn get_statistics(&self) -> OrderResult<OrderStatistics> {
        stats::compute_statistics(self.store.as_ref(), Utc::now()).await
    }

    pub async fn export_csv(&self) -> OrderResult<String> {
        export::export_csv(self.store.as_ref()).await
    }
}
