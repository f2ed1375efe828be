//! Error types for madx-api
//!
//! Graph failures render in the platform's own `{"error": {...}}` shape so
//! the dashboard can treat local and remote failures alike. Everything else
//! uses `{"error": {"code", "message"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::graph::{ErrorKind, GraphError};
use crate::services::advisor::AdvisorError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Graph API failure, status derived from the error kind
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Completion service failure
    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    /// Mirror query failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// HTTP status for a Graph failure
///
/// config → 503, transport → 502, remote → the upstream status when it is an
/// error status, otherwise 502.
pub fn graph_status(err: &GraphError) -> StatusCode {
    match err.kind {
        ErrorKind::ConfigError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::TransportError => StatusCode::BAD_GATEWAY,
        ErrorKind::RemoteError => err
            .status_code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|status| status.is_client_error() || status.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Graph(ref err) => {
                return (graph_status(err), Json(err.to_json())).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Advisor(ref err) => {
                let status = match err {
                    AdvisorError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, "ADVISOR_ERROR", err.to_string())
            }
            ApiError::Database(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
