//! API error type that maps [`GooferError`] variants to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use goofer_types::GooferError;
use serde_json::json;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Wrapper around [`GooferError`] that implements [`IntoResponse`].
#[derive(Debug)]
pub struct ApiError(pub GooferError);

impl ApiError {
    /// Returns `(status, client-facing message)` for the wrapped error.
    ///
    /// Upstream bodies, transport details and storage errors stay in the log;
    /// the browser only learns which service failed.
    fn classify(&self) -> (StatusCode, String) {
        let status = match &self.0 {
            GooferError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            GooferError::NotFound(_) => StatusCode::NOT_FOUND,
            GooferError::Upstream { status, .. } => classify_upstream(*status),
            GooferError::Http { .. } | GooferError::Auth(_) => StatusCode::BAD_GATEWAY,
            GooferError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            GooferError::Serialization(_)
            | GooferError::Storage(_)
            | GooferError::Config(_)
            | GooferError::Internal(_) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.into());
            }
        };
        let message = self
            .0
            .service()
            .map_or_else(|| self.0.to_string(), |service| format!("{service} API error"));
        (status, message)
    }
}

/// Upstream error statuses pass through; anything else is a bad gateway.
fn classify_upstream(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(code) if code.is_client_error() || code.is_server_error() => code,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<GooferError> for ApiError {
    fn from(e: GooferError) -> Self {
        Self(e)
    }
}
