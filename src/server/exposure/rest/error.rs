//! HTTP rendering of order errors

use crate::core::error::OrderError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors returned by the REST handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Invalid order id '{0}'")]
    InvalidId(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

/// HTTP status for an order error; statistics failures take their cause's status
pub fn status_code(err: &OrderError) -> StatusCode {
    match err {
        OrderError::Validation(_) => StatusCode::BAD_REQUEST,
        OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
        OrderError::Constraint { .. } => StatusCode::CONFLICT,
        OrderError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        OrderError::Statistics { source, .. } => status_code(source),
        OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn details(err: &OrderError) -> Option<serde_json::Value> {
    match err {
        OrderError::Validation(validation) => Some(json!({ "fields": validation.errors })),
        OrderError::NotFound { id } => Some(json!({ "id": id.to_string() })),
        OrderError::Statistics { aggregate, .. } => Some(json!({
            "aggregate": aggregate,
            "cause": err.root().error_code(),
        })),
        _ => None,
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Order(err) => status_code(err),
            ApiError::InvalidId(_) | ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Order(err) => err.error_code(),
            ApiError::InvalidId(_) => "INVALID_ID",
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::InvalidQuery(_) => "INVALID_QUERY",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: match self {
                ApiError::Order(err) => details(err),
                _ => None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        ApiError::Order(self).into_response()
    }
}
