//! Dashboard statistics over the whole order set
//!
//! Each figure is an independent store read. They are issued concurrently
//! and combined; there is no snapshot isolation between them, so a write
//! landing mid-report may be visible in one figure and not another.

use crate::core::error::{OrderError, OrderResult};
use crate::core::store::{GroupKey, GroupValue, NumericField, OrderFilter, OrderGroup, OrderStore};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Number of cities reported in the ranking
pub const TOP_CITIES_LIMIT: usize = 10;

/// Number of monthly buckets reported
pub const MONTHLY_TRENDS_LIMIT: usize = 12;

/// Width of the "recent orders" window
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Aggregate figures for the operator dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub total_copies: i64,
    pub recent_orders: u64,
    pub top_cities: Vec<CityStat>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityStat {
    pub city: String,
    pub orders: u64,
    pub copies: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub orders: u64,
    pub copies: i64,
}

/// The inclusive `[now - 7 days, now]` window
pub fn recent_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now - Duration::days(RECENT_WINDOW_DAYS), now)
}

/// Rank city groups by order count desc, then city name asc
pub fn rank_cities(groups: Vec<OrderGroup>) -> Vec<CityStat> {
    let mut cities: Vec<CityStat> = groups
        .into_iter()
        .filter_map(|group| match group.key {
            GroupValue::City(city) => Some(CityStat {
                city,
                orders: group.count,
                copies: group.sum,
            }),
            GroupValue::Month { .. } => None,
        })
        .collect();

    cities.sort_by(|a, b| b.orders.cmp(&a.orders).then_with(|| a.city.cmp(&b.city)));
    cities.truncate(TOP_CITIES_LIMIT);
    cities
}

/// Keep the most recent month buckets, newest first
pub fn latest_months(groups: Vec<OrderGroup>) -> Vec<MonthlyTrend> {
    let mut months: Vec<MonthlyTrend> = groups
        .into_iter()
        .filter_map(|group| match group.key {
            GroupValue::Month { year, month } => Some(MonthlyTrend {
                year,
                month,
                orders: group.count,
                copies: group.sum,
            }),
            GroupValue::City(_) => None,
        })
        .collect();

    months.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    months.truncate(MONTHLY_TRENDS_LIMIT);
    months
}

/// Compute every dashboard figure as of `now`.
///
/// Fails as a whole when any figure fails; the error names that figure.
pub async fn compute_statistics(
    store: &dyn OrderStore,
    now: DateTime<Utc>,
) -> OrderResult<OrderStatistics> {
    let (from, to) = recent_window(now);
    let recent_filter = OrderFilter::created_between(from, to);

    let total_orders = async {
        store
            .count_all()
            .await
            .map_err(|e| OrderError::sub_aggregate("totalOrders", e))
    };
    let total_copies = async {
        store
            .sum(NumericField::Copies)
            .await
            .map_err(|e| OrderError::sub_aggregate("totalCopies", e))
    };
    let recent_orders = async {
        store
            .count_where(&recent_filter)
            .await
            .map_err(|e| OrderError::sub_aggregate("recentOrders", e))
    };
    let top_cities = async {
        store
            .group_by(GroupKey::City, NumericField::Copies)
            .await
            .map(rank_cities)
            .map_err(|e| OrderError::sub_aggregate("topCities", e))
    };
    let monthly_trends = async {
        store
            .group_by(GroupKey::YearMonth, NumericField::Copies)
            .await
            .map(latest_months)
            .map_err(|e| OrderError::sub_aggregate("monthlyTrends", e))
    };

    let (total_orders, total_copies, recent_orders, top_cities, monthly_trends) = futures::try_join!(
        total_orders,
        total_copies,
        recent_orders,
        top_cities,
        monthly_trends
    )?;

    Ok(OrderStatistics {
        total_orders,
        total_copies,
        recent_orders,
        top_cities,
        monthly_trends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::{BookOrder, NewOrder, OrderPatch};
    use crate::core::query::OrderSort;
    use crate::core::store::StoreError;
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Store answering fixed figures; the read feeding `fail` reports the
    /// backend as unavailable
    struct StubStore {
        fail: Option<&'static str>,
    }

    impl StubStore {
        fn answer<T>(&self, aggregate: &str, value: T) -> Result<T, StoreError> {
            if self.fail == Some(aggregate) {
                Err(StoreError::Unavailable {
                    backend: "stub",
                    message: "down".to_string(),
                })
            } else {
                Ok(value)
            }
        }

        fn unused<T>() -> Result<T, StoreError> {
            Err(StoreError::Backend {
                backend: "stub",
                message: "not used by statistics".to_string(),
            })
        }
    }

    #[async_trait]
    impl OrderStore for StubStore {
        fn backend(&self) -> &'static str {
            "stub"
        }

        async fn insert(&self, _order: NewOrder) -> Result<BookOrder, StoreError> {
            Self::unused()
        }

        async fn find_by_id(&self, _id: &Uuid) -> Result<BookOrder, StoreError> {
            Self::unused()
        }

        async fn update_by_id(
            &self,
            _id: &Uuid,
            _patch: OrderPatch,
        ) -> Result<BookOrder, StoreError> {
            Self::unused()
        }

        async fn delete_by_id(&self, _id: &Uuid) -> Result<(), StoreError> {
            Self::unused()
        }

        async fn query(
            &self,
            _filter: &OrderFilter,
            _sort: OrderSort,
            _skip: usize,
            _take: Option<usize>,
        ) -> Result<(Vec<BookOrder>, u64), StoreError> {
            Self::unused()
        }

        async fn count_all(&self) -> Result<u64, StoreError> {
            self.answer("totalOrders", 3)
        }

        async fn count_where(&self, _filter: &OrderFilter) -> Result<u64, StoreError> {
            self.answer("recentOrders", 2)
        }

        async fn sum(&self, _field: NumericField) -> Result<i64, StoreError> {
            self.answer("totalCopies", 10)
        }

        async fn group_by(
            &self,
            key: GroupKey,
            _sum: NumericField,
        ) -> Result<Vec<OrderGroup>, StoreError> {
            match key {
                GroupKey::City => self.answer(
                    "topCities",
                    vec![city("Karachi", 1, 3), city("Lahore", 2, 7)],
                ),
                GroupKey::YearMonth => self.answer("monthlyTrends", vec![month(2025, 3, 3)]),
            }
        }
    }

    fn city(name: &str, count: u64, sum: i64) -> OrderGroup {
        OrderGroup {
            key: GroupValue::City(name.to_string()),
            count,
            sum,
        }
    }

    fn month(year: i32, month: u32, count: u64) -> OrderGroup {
        OrderGroup {
            key: GroupValue::Month { year, month },
            count,
            sum: count as i64,
        }
    }

    #[test]
    fn test_rank_cities_orders_by_count_then_name() {
        let ranked = rank_cities(vec![
            city("Multan", 1, 4),
            city("Lahore", 2, 7),
            city("Karachi", 2, 3),
            city("Quetta", 5, 5),
        ]);
        let names: Vec<&str> = ranked.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(names, vec!["Quetta", "Karachi", "Lahore", "Multan"]);
        assert_eq!(ranked[2].copies, 7);
    }

    #[test]
    fn test_rank_cities_keeps_top_ten() {
        let groups = (0..15).map(|i| city(&format!("City{:02}", i), i, 1)).collect();
        let ranked = rank_cities(groups);
        assert_eq!(ranked.len(), TOP_CITIES_LIMIT);
        assert_eq!(ranked[0].city, "City14");
        assert_eq!(ranked[9].city, "City05");
    }

    #[test]
    fn test_latest_months_newest_first() {
        let trends = latest_months(vec![
            month(2024, 12, 1),
            month(2025, 2, 3),
            month(2025, 1, 2),
        ]);
        let keys: Vec<(i32, u32)> = trends.iter().map(|t| (t.year, t.month)).collect();
        assert_eq!(keys, vec![(2025, 2), (2025, 1), (2024, 12)]);
    }

    #[test]
    fn test_latest_months_keeps_twelve() {
        let groups = (1..=12)
            .map(|m| month(2024, m, 1))
            .chain((1..=3).map(|m| month(2025, m, 1)))
            .collect();
        let trends = latest_months(groups);
        assert_eq!(trends.len(), MONTHLY_TRENDS_LIMIT);
        assert_eq!((trends[0].year, trends[0].month), (2025, 3));
        assert_eq!((trends[11].year, trends[11].month), (2024, 4));
    }

    #[test]
    fn test_recent_window_is_seven_days() {
        let now = Utc::now();
        let (from, to) = recent_window(now);
        assert_eq!(to, now);
        assert_eq!(to - from, Duration::days(7));
    }

    #[test]
    fn test_statistics_serialize_camel_case() {
        let stats = OrderStatistics {
            total_orders: 3,
            total_copies: 10,
            recent_orders: 3,
            top_cities: vec![],
            monthly_trends: vec![],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalOrders"], 3);
        assert_eq!(json["totalCopies"], 10);
        assert_eq!(json["recentOrders"], 3);
        assert!(json["topCities"].is_array());
        assert!(json["monthlyTrends"].is_array());
    }

    #[tokio::test]
    async fn test_compute_statistics_combines_figures() {
        let stats = compute_statistics(&StubStore { fail: None }, Utc::now())
            .await
            .unwrap();

        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_copies, 10);
        assert_eq!(stats.recent_orders, 2);
        assert_eq!(stats.top_cities[0].city, "Lahore");
        assert_eq!(stats.monthly_trends.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_city_ranking_fails_whole_report() {
        let result = compute_statistics(&StubStore { fail: Some("topCities") }, Utc::now()).await;

        match result {
            Err(OrderError::Statistics { aggregate, source }) => {
                assert_eq!(aggregate, "topCities");
                assert!(matches!(*source, OrderError::StoreUnavailable { .. }));
            }
            other => panic!("expected a topCities failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_every_figure_is_named_on_failure() {
        for name in [
            "totalOrders",
            "totalCopies",
            "recentOrders",
            "topCities",
            "monthlyTrends",
        ] {
            let err = compute_statistics(&StubStore { fail: Some(name) }, Utc::now())
                .await
                .unwrap_err();
            assert!(
                matches!(&err, OrderError::Statistics { aggregate, .. } if *aggregate == name),
                "{} reported as {}",
                name,
                err
            );
            assert_eq!(err.root().error_code(), "STORE_UNAVAILABLE");
        }
    }
}
