//! HTTP error taxonomy.
//!
//! Storage functions return `anyhow::Result`; handlers translate failures
//! into an `ApiError` at the HTTP boundary. Every variant renders as
//! `{"message": "..."}` with the matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input on a write → 400.
    #[error("{0}")]
    Validation(String),
    /// Identifier did not resolve → 404.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Missing or invalid credential → 401.
    #[error("{0}")]
    Unauthorized(&'static str),
    /// Unexpected store failure → 500 with the driver message.
    #[error("{0}")]
    Store(String),
}

impl ApiError {
    /// Wrap a storage-layer failure, preserving the underlying message.
    pub fn store(err: anyhow::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
