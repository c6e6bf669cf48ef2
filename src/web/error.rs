//! HTTP error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::HubFeedError;

/// Error returned by the HTTP handlers.
///
/// Clients only ever see the status code; the cause stays in the server log.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    source: HubFeedError,
}

impl ApiError {
    /// Create an internal server error.
    pub fn internal(source: HubFeedError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source,
        }
    }

    /// The HTTP status of this error.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            repository = self.source.repository().unwrap_or("-"),
            "Failed to build feed: {}",
            self.source
        );
        self.status.into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.source)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<HubFeedError> for ApiError {
    fn from(err: HubFeedError) -> Self {
        ApiError::internal(err)
    }
}
