//! Error types for request translation and program invocation.

use std::time::Duration;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while serving a request through the external program.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request method has no `gh api` counterpart.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(Method),

    /// `page` or `per_page` is not an integer.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// Body is not JSON, not an object or array, or carries a non-string field.
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    /// The program could not be started or awaited.
    #[error("Invocation failed: {0}")]
    Invocation(#[from] std::io::Error),

    /// The program did not exit before the deadline and was killed.
    #[error("Invocation timed out after {0:?}")]
    InvocationTimeout(Duration),

    /// The program could not be located at construction time.
    #[error("Program `{program}` not found: {source}")]
    ProgramNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    /// The local listener could not be bound.
    #[error("Failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// The HTTP client handed to callers could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

impl TransportError {
    /// HTTP status reported to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            TransportError::UnsupportedMethod(_)
            | TransportError::MalformedQuery(_)
            | TransportError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            TransportError::InvocationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            TransportError::Invocation(_)
            | TransportError::ProgramNotFound { .. }
            | TransportError::Bind(_)
            | TransportError::Client(_)
            | TransportError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Translation-layer errors carry no body so callers only see the status.
impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        assert_eq!(
            TransportError::UnsupportedMethod(Method::PUT).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TransportError::MalformedBody("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TransportError::MalformedQuery("page".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_invocation_errors_are_not_bad_request() {
        let err = TransportError::Invocation(std::io::Error::other("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = TransportError::InvocationTimeout(Duration::from_secs(5));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_error_display() {
        let err = TransportError::UnsupportedMethod(Method::PUT);
        assert_eq!(err.to_string(), "Unsupported method: PUT");

        let err = TransportError::InvocationTimeout(Duration::from_secs(3));
        assert!(err.to_string().contains("3s"));
    }

    #[test]
    fn test_error_response_has_empty_body() {
        let response = TransportError::MalformedBody("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
