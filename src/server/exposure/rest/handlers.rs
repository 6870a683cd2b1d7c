//! HTTP handlers for book order operations

use super::error::ApiError;
use crate::core::export::format_order_date;
use crate::core::order::BookOrder;
use crate::core::query::{OrderQuery, PaginationMeta};
use crate::core::stats::OrderStatistics;
use crate::server::host::ServerHost;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across handlers
pub type OrderApiState = Arc<ServerHost>;

/// An order as presented over HTTP, with its display date
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: BookOrder,

    /// `createdAt` in long English form, e.g. `March 5, 2025, 09:07 AM`
    pub formatted_date: String,
}

impl From<BookOrder> for OrderView {
    fn from(order: BookOrder) -> Self {
        let formatted_date = format_order_date(&order.created_at);
        Self {
            order,
            formatted_date,
        }
    }
}

/// Response for list orders endpoint
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderView>,
    pub pagination: PaginationMeta,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// Create a new order
///
/// POST /api/book-orders
pub async fn create_order(
    State(state): State<OrderApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = body?;
    let order = state.service.create_order(&input).await?;
    tracing::info!(order_id = %order.id, copies = order.copies, "order created");

    Ok((StatusCode::CREATED, Json(OrderView::from(order))).into_response())
}

/// List orders with search, city filter, sorting and paging
///
/// GET /api/book-orders?page=1&limit=50&search=..&city=..&sortBy=..&sortOrder=..
pub async fn list_orders(
    State(state): State<OrderApiState>,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> Result<Json<ListOrdersResponse>, ApiError> {
    let Query(query) = query?;
    let page = state.service.list_orders(&query).await?;

    Ok(Json(ListOrdersResponse {
        orders: page.orders.into_iter().map(OrderView::from).collect(),
        pagination: page.pagination,
    }))
}

/// GET /api/book-orders/stats
pub async fn get_statistics(
    State(state): State<OrderApiState>,
) -> Result<Json<OrderStatistics>, ApiError> {
    Ok(Json(state.service.get_statistics().await?))
}

/// Download every order as CSV
///
/// GET /api/book-orders/export
pub async fn export_orders(State(state): State<OrderApiState>) -> Result<Response, ApiError> {
    let csv = state.service.export_csv().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=book-orders.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /api/book-orders/{id}
pub async fn get_order(
    State(state): State<OrderApiState>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    let id = parse_id(&id)?;
    let order = state.service.get_order(&id).await?;
    Ok(Json(order.into()))
}

/// Update the fields present in the body
///
/// PUT/PATCH /api/book-orders/{id}
pub async fn update_order(
    State(state): State<OrderApiState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<OrderView>, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let order = state.service.update_order(&id, &input).await?;
    tracing::info!(order_id = %id, "order updated");

    Ok(Json(order.into()))
}

/// DELETE /api/book-orders/{id}
pub async fn delete_order(
    State(state): State<OrderApiState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_order(&id).await?;
    tracing::info!(order_id = %id, "order deleted");

    Ok(Json(json!({
        "message": "Order deleted successfully",
        "id": id,
    })))
}

/// Readiness: the store answers a ping
///
/// GET /ready
pub async fn readiness(State(state): State<OrderApiState>) -> Response {
    match state.service.store().ping().await {
        Ok(()) => Json(json!({ "status": "ready", "backend": state.backend() })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "backend": state.backend(),
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
