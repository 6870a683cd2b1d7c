//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! The `order_store_tests!` macro generates a test module that validates any
//! `OrderStore` implementation against the full contract: CRUD, filtering,
//! sorting and paging, counts, sums and groupings.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use bookorders::storage::InMemoryOrderStore;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```
//!
//! The store type must also provide an inherent
//! `async fn seed(&self, order: BookOrder) -> Result<(), StoreError>` used to
//! load orders with fixed creation times.

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. For the
/// concurrent insert test the store must also be `Clone + 'static`.
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use bookorders::core::order::{OrderPatch, OrderStatus};
            use bookorders::core::query::{OrderSort, SortField, SortOrder};
            use bookorders::core::store::{
                GroupKey, GroupValue, NumericField, OrderFilter, OrderStore, StoreError,
            };
            use chrono::Duration;
            use std::collections::HashSet;
            use uuid::Uuid;

            fn search(text: &str) -> OrderFilter {
                OrderFilter {
                    search: Some(text.to_string()),
                    ..OrderFilter::default()
                }
            }

            fn city(text: &str) -> OrderFilter {
                OrderFilter {
                    city: Some(text.to_string()),
                    ..OrderFilter::default()
                }
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_find() {
                let store = $factory;
                let inserted = store.insert(new_order("Ayesha Khan", "Lahore", 3)).await.unwrap();

                assert_eq!(inserted.name, "Ayesha Khan");
                assert_eq!(inserted.copies, 3);
                assert_eq!(inserted.order_value, 1500);
                assert_eq!(inserted.status, OrderStatus::Pending);
                assert_eq!(inserted.created_at, inserted.updated_at);

                let found = store.find_by_id(&inserted.id).await.unwrap();
                assert_eq!(found, inserted);
            }

            #[tokio::test]
            async fn test_find_missing() {
                let store = $factory;
                let id = Uuid::new_v4();
                match store.find_by_id(&id).await {
                    Err(StoreError::NotFound { id: missing }) => assert_eq!(missing, id),
                    other => panic!("expected NotFound, got {:?}", other.map(|o| o.id)),
                }
            }

            #[tokio::test]
            async fn test_update_applies_patch_and_touches() {
                let store = $factory;
                let inserted = store.insert(new_order("Bilal", "Lahore", 2)).await.unwrap();
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;

                let updated = store
                    .update_by_id(
                        &inserted.id,
                        OrderPatch {
                            city: Some("Karachi".to_string()),
                            status: Some(OrderStatus::Shipped),
                            notes: Some(Some("Leave at door".to_string())),
                            ..OrderPatch::default()
                        },
                    )
                    .await
                    .unwrap();

                assert_eq!(updated.city, "Karachi");
                assert_eq!(updated.status, OrderStatus::Shipped);
                assert_eq!(updated.notes.as_deref(), Some("Leave at door"));
                assert_eq!(updated.name, inserted.name);
                assert_eq!(updated.order_value, inserted.order_value);
                assert_eq!(updated.created_at, inserted.created_at);
                assert!(updated.updated_at > inserted.updated_at);

                assert_eq!(store.find_by_id(&inserted.id).await.unwrap(), updated);
            }

            #[tokio::test]
            async fn test_update_clears_notes() {
                let store = $factory;
                let mut order = new_order("Bilal", "Lahore", 2);
                order.notes = Some("fragile".to_string());
                let inserted = store.insert(order).await.unwrap();

                let updated = store
                    .update_by_id(
                        &inserted.id,
                        OrderPatch {
                            notes: Some(None),
                            ..OrderPatch::default()
                        },
                    )
                    .await
                    .unwrap();
                assert_eq!(updated.notes, None);
            }

            #[tokio::test]
            async fn test_update_missing() {
                let store = $factory;
                let result = store
                    .update_by_id(&Uuid::new_v4(), OrderPatch::default())
                    .await;
                assert!(matches!(result, Err(StoreError::NotFound { .. })));
            }

            #[tokio::test]
            async fn test_delete_twice() {
                let store = $factory;
                let inserted = store.insert(new_order("Sana", "Multan", 1)).await.unwrap();

                store.delete_by_id(&inserted.id).await.unwrap();
                assert!(matches!(
                    store.find_by_id(&inserted.id).await,
                    Err(StoreError::NotFound { .. })
                ));
                assert!(matches!(
                    store.delete_by_id(&inserted.id).await,
                    Err(StoreError::NotFound { .. })
                ));
            }

            // ==================================================================
            // Query
            // ==================================================================

            #[tokio::test]
            async fn test_query_empty_store() {
                let store = $factory;
                let (orders, total) = store
                    .query(&OrderFilter::all(), OrderSort::newest_first(), 0, Some(50))
                    .await
                    .unwrap();
                assert!(orders.is_empty());
                assert_eq!(total, 0);
            }

            #[tokio::test]
            async fn test_query_newest_first_by_default() {
                let store = $factory;
                store.seed(order_at("Old", "Lahore", 1, utc(2024, 1, 1, 9, 0))).await.unwrap();
                store.seed(order_at("New", "Lahore", 1, utc(2025, 1, 1, 9, 0))).await.unwrap();
                store.seed(order_at("Mid", "Lahore", 1, utc(2024, 6, 1, 9, 0))).await.unwrap();

                let (orders, total) = store
                    .query(&OrderFilter::all(), OrderSort::newest_first(), 0, None)
                    .await
                    .unwrap();
                let names: Vec<_> = orders.iter().map(|o| o.name.as_str()).collect();
                assert_eq!(names, vec!["New", "Mid", "Old"]);
                assert_eq!(total, 3);
            }

            #[tokio::test]
            async fn test_search_is_case_insensitive_across_fields() {
                let store = $factory;
                store.insert(new_order("Ali Raza", "Lahore", 1)).await.unwrap();
                store.insert(new_order("Hina", "Karachi", 1)).await.unwrap();
                let mut other = new_order("Omar", "Quetta", 1);
                other.mobile = "03219876543".to_string();
                store.insert(other).await.unwrap();

                for (text, expected) in [("RAZA", 1), ("karachi", 1), ("EXAMPLE.COM", 3), ("98765", 1), ("nobody", 0)] {
                    let count = store.count_where(&search(text)).await.unwrap();
                    assert_eq!(count, expected, "search {:?}", text);
                }
            }

            #[tokio::test]
            async fn test_search_is_literal() {
                let store = $factory;
                store.insert(new_order("a.b", "Lahore", 1)).await.unwrap();
                store.insert(new_order("axb", "Lahore", 1)).await.unwrap();

                assert_eq!(store.count_where(&search("a.b")).await.unwrap(), 1);
                assert_eq!(store.count_where(&search("(")).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_city_filter_and_paging() {
                let store = $factory;
                store.seed(order_at("First", "Lahore", 1, utc(2025, 3, 1, 9, 0))).await.unwrap();
                store.seed(order_at("Second", "Karachi", 1, utc(2025, 3, 2, 9, 0))).await.unwrap();
                store.seed(order_at("Third", "Lahore", 1, utc(2025, 3, 3, 9, 0))).await.unwrap();

                let filter = city("lahore");
                let (all, total) = store
                    .query(&filter, OrderSort::newest_first(), 0, None)
                    .await
                    .unwrap();
                assert_eq!(total, 2);
                assert!(all.iter().all(|o| o.city == "Lahore"));

                let (page, total) = store
                    .query(&filter, OrderSort::newest_first(), 1, Some(1))
                    .await
                    .unwrap();
                assert_eq!(total, 2);
                assert_eq!(page.len(), 1);
                assert_eq!(page[0].name, "First");
            }

            #[tokio::test]
            async fn test_search_and_city_combine() {
                let store = $factory;
                store.insert(new_order("Ali", "Lahore", 1)).await.unwrap();
                store.insert(new_order("Ali", "Karachi", 1)).await.unwrap();
                store.insert(new_order("Sara", "Lahore", 1)).await.unwrap();

                let filter = OrderFilter {
                    search: Some("ali".to_string()),
                    city: Some("LAHORE".to_string()),
                    ..OrderFilter::default()
                };
                assert_eq!(store.count_where(&filter).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_sort_by_copies() {
                let store = $factory;
                for (name, copies) in [("B", 5), ("A", 2), ("C", 9)] {
                    store.insert(new_order(name, "Lahore", copies)).await.unwrap();
                }

                let (asc, _) = store
                    .query(
                        &OrderFilter::all(),
                        OrderSort::new(SortField::Copies, SortOrder::Asc),
                        0,
                        None,
                    )
                    .await
                    .unwrap();
                let copies: Vec<u32> = asc.iter().map(|o| o.copies).collect();
                assert_eq!(copies, vec![2, 5, 9]);

                let (desc, _) = store
                    .query(
                        &OrderFilter::all(),
                        OrderSort::new(SortField::Name, SortOrder::Desc),
                        0,
                        None,
                    )
                    .await
                    .unwrap();
                let names: Vec<_> = desc.iter().map(|o| o.name.as_str()).collect();
                assert_eq!(names, vec!["C", "B", "A"]);
            }

            #[tokio::test]
            async fn test_paging_over_ties_is_stable() {
                let store = $factory;
                for i in 0..7 {
                    store.insert(new_order(&format!("Reader {}", i), "Lahore", 4)).await.unwrap();
                }
                let sort = OrderSort::new(SortField::Copies, SortOrder::Desc);

                let mut seen = HashSet::new();
                for page in 0..4 {
                    let (orders, total) = store
                        .query(&OrderFilter::all(), sort, page * 2, Some(2))
                        .await
                        .unwrap();
                    assert_eq!(total, 7);
                    for order in orders {
                        assert!(seen.insert(order.id), "order repeated across pages");
                    }
                }
                assert_eq!(seen.len(), 7);
            }

            #[tokio::test]
            async fn test_ties_list_oldest_first_in_both_directions() {
                let store = $factory;
                store.seed(order_at("Middle", "Lahore", 4, utc(2025, 3, 2, 9, 0))).await.unwrap();
                store.seed(order_at("Newest", "Lahore", 4, utc(2025, 3, 3, 9, 0))).await.unwrap();
                store.seed(order_at("Oldest", "Lahore", 4, utc(2025, 3, 1, 9, 0))).await.unwrap();
                store.seed(order_at("Single", "Lahore", 9, utc(2025, 3, 4, 9, 0))).await.unwrap();

                for order in [SortOrder::Asc, SortOrder::Desc] {
                    let (orders, _) = store
                        .query(&OrderFilter::all(), OrderSort::new(SortField::Copies, order), 0, None)
                        .await
                        .unwrap();
                    let tied: Vec<&str> = orders
                        .iter()
                        .filter(|o| o.copies == 4)
                        .map(|o| o.name.as_str())
                        .collect();
                    assert_eq!(tied, vec!["Oldest", "Middle", "Newest"], "direction {:?}", order);
                }
            }

            // ==================================================================
            // Aggregates
            // ==================================================================

            #[tokio::test]
            async fn test_counts_and_sums() {
                let store = $factory;
                assert_eq!(store.count_all().await.unwrap(), 0);
                assert_eq!(store.sum(NumericField::Copies).await.unwrap(), 0);

                for copies in [2, 3, 5] {
                    store.insert(new_order("Reader", "Lahore", copies)).await.unwrap();
                }
                assert_eq!(store.count_all().await.unwrap(), 3);
                assert_eq!(store.sum(NumericField::Copies).await.unwrap(), 10);
                assert_eq!(store.sum(NumericField::OrderValue).await.unwrap(), 5000);
            }

            #[tokio::test]
            async fn test_count_in_created_window() {
                let store = $factory;
                let now = now_seconds();
                store.seed(order_at("Today", "Lahore", 1, now)).await.unwrap();
                store.seed(order_at("Edge", "Lahore", 1, now - Duration::days(7))).await.unwrap();
                store.seed(order_at("Stale", "Lahore", 1, now - Duration::days(8))).await.unwrap();

                let window = OrderFilter::created_between(now - Duration::days(7), now);
                assert_eq!(store.count_where(&window).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_group_by_city() {
                let store = $factory;
                store.insert(new_order("A", "Lahore", 2)).await.unwrap();
                store.insert(new_order("B", "Karachi", 3)).await.unwrap();
                store.insert(new_order("C", "Lahore", 5)).await.unwrap();

                let mut groups = store
                    .group_by(GroupKey::City, NumericField::Copies)
                    .await
                    .unwrap();
                groups.sort_by(|a, b| b.count.cmp(&a.count));

                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].key, GroupValue::City("Lahore".to_string()));
                assert_eq!((groups[0].count, groups[0].sum), (2, 7));
                assert_eq!(groups[1].key, GroupValue::City("Karachi".to_string()));
                assert_eq!((groups[1].count, groups[1].sum), (1, 3));
            }

            #[tokio::test]
            async fn test_group_by_month_uses_utc() {
                let store = $factory;
                store.seed(order_at("A", "Lahore", 1, utc(2025, 1, 31, 23, 30))).await.unwrap();
                store.seed(order_at("B", "Lahore", 2, utc(2025, 2, 1, 0, 30))).await.unwrap();
                store.seed(order_at("C", "Lahore", 4, utc(2025, 2, 14, 12, 0))).await.unwrap();

                let mut groups = store
                    .group_by(GroupKey::YearMonth, NumericField::Copies)
                    .await
                    .unwrap();
                groups.sort_by_key(|g| match g.key {
                    GroupValue::Month { year, month } => (year, month),
                    GroupValue::City(_) => (0, 0),
                });

                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].key, GroupValue::Month { year: 2025, month: 1 });
                assert_eq!((groups[0].count, groups[0].sum), (1, 1));
                assert_eq!(groups[1].key, GroupValue::Month { year: 2025, month: 2 });
                assert_eq!((groups[1].count, groups[1].sum), (2, 6));
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_ping() {
                let store = $factory;
                assert!(store.ping().await.is_ok());
            }

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .insert(new_order(&format!("Reader {}", i), "Lahore", 1))
                            .await
                            .unwrap()
                            .id
                    }));
                }

                let mut ids = HashSet::new();
                for handle in handles {
                    ids.insert(handle.await.unwrap());
                }
                assert_eq!(ids.len(), 10);
                assert_eq!(store.count_all().await.unwrap(), 10);
            }
        }
    };
}
