//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the order
//! routes, health probes, CORS and request tracing.

pub mod error;
pub mod handlers;

use super::super::host::ServerHost;
use crate::config::CorsConfig;
use anyhow::Result;
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};

/// Base path of the order resource
pub const ORDERS_PATH: &str = "/api/book-orders";

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Order routes
    /// - Custom routes
    ///
    /// wrapped in the CORS and tracing layers.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let cors = Self::cors_layer(&host.config.cors);

        let mut app = Self::health_routes().merge(Self::order_routes(host));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
    }

    /// Order resource routes
    fn order_routes(host: Arc<ServerHost>) -> Router {
        let item_path = format!("{}/{{id}}", ORDERS_PATH);

        Router::new()
            .route(
                ORDERS_PATH,
                get(handlers::list_orders).post(handlers::create_order),
            )
            .route(
                &format!("{}/stats", ORDERS_PATH),
                get(handlers::get_statistics),
            )
            .route(
                &format!("{}/export", ORDERS_PATH),
                get(handlers::export_orders),
            )
            .route(
                &item_path,
                get(handlers::get_order)
                    .put(handlers::update_order)
                    .patch(handlers::update_order)
                    .delete(handlers::delete_order),
            )
            .route("/ready", get(handlers::readiness))
            .with_state(host)
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "book-orders"
        }))
    }

    /// CORS for the configured origins; `*` allows any origin
    pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE]);

        if config.allowed_origins.iter().any(|origin| origin == "*") {
            return layer.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        layer.allow_origin(AllowOrigin::list(origins))
    }
}
