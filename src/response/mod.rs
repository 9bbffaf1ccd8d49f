//! Response reconstruction subsystem.
//!
//! # Data Flow
//! ```text
//! ProcessResult
//!     → status.rs (exit status + `(HTTP nnn)` marker → status, body)
//!     → pagination.rs (successful paginated runs only: pick page, add Link)
//!     → OutgoingResponse
//! ```

pub mod pagination;
pub mod status;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::process::ProcessResult;
use crate::translate::PageContext;

pub use pagination::{emulate_page, page_fragments};
pub use status::{embedded_status, resolve_status};

/// The response handed back to the REST client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub status: StatusCode,
    /// `Link` header advertising the next page.
    pub link: Option<String>,
    pub body: Vec<u8>,
}

impl OutgoingResponse {
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            link: None,
            body,
        }
    }
}

/// Rebuild the HTTP response for a finished run.
pub fn reconstruct(result: ProcessResult, page: &PageContext) -> OutgoingResponse {
    let mut response = resolve_status(result);
    if response.status.is_success() && page.is_requested() {
        let (body, link) = emulate_page(std::mem::take(&mut response.body), page);
        response.body = body;
        response.link = link;
    }
    response
}

impl IntoResponse for OutgoingResponse {
    fn into_response(self) -> Response {
        let mut builder = Response::builder().status(self.status);
        if !self.body.is_empty() {
            builder = builder.header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
        }
        if let Some(link) = self.link {
            match HeaderValue::from_str(&link) {
                Ok(value) => builder = builder.header(header::LINK, value),
                Err(e) => tracing::warn!(error = %e, link = %link, "Dropping invalid Link header"),
            }
        }
        builder
            .body(Body::from(self.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}
