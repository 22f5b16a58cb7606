//! Error types for the city lookup service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Mirror Error ==
/// Failures of the durable snapshot slot.
///
/// Never leaves the cache: every mirror call is downgraded to a no-op on error.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Slot could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot encoding error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write would exceed the store's byte quota
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Store is switched off or its lock is poisoned
    #[error("Storage unavailable")]
    Unavailable,
}

// == Aggregate Error ==
/// Failures of the upstream aggregation (weather, country, places).
///
/// The `Display` output is the reason embedded in [`FetchError::Failed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// Empty or blank city name
    #[error("City name is required")]
    MissingName,

    /// API key for the named provider is absent
    #[error("{0} API key not configured")]
    NotConfigured(&'static str),

    /// Provider answered with a non-success status
    #[error("Failed to fetch {provider} data")]
    Upstream { provider: &'static str, status: u16 },

    /// Provider answered but the payload lacks a required field
    #[error("{0}")]
    Incomplete(String),

    /// Body could not be decoded
    #[error("Invalid JSON: {0}")]
    Malformed(String),

    /// Transport failure (connection refused, timeout, ...)
    #[error("{0}")]
    Network(String),
}

impl AggregateError {
    pub fn upstream(provider: &'static str, status: u16) -> Self {
        Self::Upstream { provider, status }
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::Incomplete(message.into())
    }
}

impl From<reqwest::Error> for AggregateError {
    /// Drops the request URL first; provider keys travel in the query string.
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

// == Fetch Error ==
/// Caller-visible error of the city fetcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Upstream aggregation failed; wraps the underlying reason
    #[error("Failed to fetch city data: {0}")]
    Failed(String),

    /// Request rejected before reaching the fetcher
    #[error("{0}")]
    InvalidRequest(String),
}

impl From<AggregateError> for FetchError {
    fn from(err: AggregateError) -> Self {
        Self::Failed(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        let status = match &self {
            FetchError::Failed(_) => StatusCode::BAD_GATEWAY,
            FetchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the fetcher.
pub type Result<T> = std::result::Result<T, FetchError>;
