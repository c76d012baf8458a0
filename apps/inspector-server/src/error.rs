//! Error types for the inspector server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use compliance_engine::{ReportError, SourceError};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::Source(SourceError::InvalidUrl(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_URL")
            }
            ServerError::Source(SourceError::Timeout { .. }) => {
                (StatusCode::GATEWAY_TIMEOUT, "SOURCE_UNAVAILABLE")
            }
            ServerError::Source(_) => (StatusCode::BAD_GATEWAY, "SOURCE_UNAVAILABLE"),
            ServerError::Report(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REPORT_ERROR"),
        };

        if status.is_server_error() {
            warn!("{} ({})", self, code);
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_map_to_gateway_statuses() {
        let timeout = ServerError::from(SourceError::Timeout {
            url: "https://bankrot.example".into(),
            seconds: 10,
        });
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let http = ServerError::from(SourceError::Http {
            url: "https://bankrot.example".into(),
            status: 503,
        });
        assert_eq!(http.into_response().status(), StatusCode::BAD_GATEWAY);

        let invalid = ServerError::from(SourceError::InvalidUrl("x".into()));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
