//! In-memory implementation of OrderStore for testing and development

use crate::core::order::{BookOrder, NewOrder, OrderPatch};
use crate::core::query::OrderSort;
use crate::core::store::{GroupKey, NumericField, OrderFilter, OrderGroup, OrderStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "in-memory";

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend {
        backend: BACKEND,
        message: format!("Failed to acquire lock: {}", e),
    }
}

/// In-memory order store
///
/// Keeps orders in insertion order, which breaks ties left after `created_at`.
/// Every operation holds the lock for its whole duration.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<IndexMap<Uuid, BookOrder>>>,
}

impl InMemoryOrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed order, keeping its id and timestamps.
    ///
    /// Used to load fixtures with historical creation dates.
    pub async fn seed(&self, order: BookOrder) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(lock_error)?;
        if orders.contains_key(&order.id) {
            return Err(StoreError::Constraint(format!(
                "duplicate order id {}",
                order.id
            )));
        }
        orders.insert(order.id, order);
        Ok(())
    }

}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn insert(&self, order: NewOrder) -> Result<BookOrder, StoreError> {
        let mut orders = self.orders.write().map_err(lock_error)?;

        let order = BookOrder::from_new(Uuid::new_v4(), order, Utc::now());
        orders.insert(order.id, order.clone());
        tracing::debug!(order_id = %order.id, "order stored");

        Ok(order)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<BookOrder, StoreError> {
        let orders = self.orders.read().map_err(lock_error)?;

        orders
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound { id: *id })
    }

    async fn update_by_id(&self, id: &Uuid, patch: OrderPatch) -> Result<BookOrder, StoreError> {
        let mut orders = self.orders.write().map_err(lock_error)?;

        let order = orders
            .get_mut(id)
            .ok_or(StoreError::NotFound { id: *id })?;
        order.apply_patch(patch);
        order.touch();

        Ok(order.clone())
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(lock_error)?;

        orders
            .shift_remove(id)
            .map(|_| tracing::debug!(order_id = %id, "order removed"))
            .ok_or(StoreError::NotFound { id: *id })
    }

    async fn query(
        &self,
        filter: &OrderFilter,
        sort: OrderSort,
        skip: usize,
        take: Option<usize>,
    ) -> Result<(Vec<BookOrder>, u64), StoreError> {
        let orders = self.orders.read().map_err(lock_error)?;

        let mut matched: Vec<&BookOrder> =
            orders.values().filter(|order| filter.matches(order)).collect();
        // Stable: full ties stay in insertion order
        matched.sort_by(|a, b| sort.compare(a, b));

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(skip)
            .take(take.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        let orders = self.orders.read().map_err(lock_error)?;
        Ok(orders.len() as u64)
    }

    async fn count_where(&self, filter: &OrderFilter) -> Result<u64, StoreError> {
        let orders = self.orders.read().map_err(lock_error)?;
        Ok(orders.values().filter(|order| filter.matches(order)).count() as u64)
    }

    async fn sum(&self, field: NumericField) -> Result<i64, StoreError> {
        let orders = self.orders.read().map_err(lock_error)?;
        Ok(orders.values().map(|order| field.value_of(order)).sum())
    }

    async fn group_by(
        &self,
        key: GroupKey,
        sum: NumericField,
    ) -> Result<Vec<OrderGroup>, StoreError> {
        let orders = self.orders.read().map_err(lock_error)?;

        let mut groups: IndexMap<_, OrderGroup> = IndexMap::new();
        for order in orders.values() {
            let value = key.key_of(order);
            let group = groups.entry(value.clone()).or_insert(OrderGroup {
                key: value,
                count: 0,
                sum: 0,
            });
            group.count += 1;
            group.sum += sum.value_of(order);
        }

        Ok(groups.into_values().collect())
    }
}
