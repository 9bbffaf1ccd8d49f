//! Status recovery from the program's exit and diagnostics.

use std::sync::LazyLock;

use axum::http::StatusCode;
use regex::bytes::Regex;

use crate::process::ProcessResult;
use crate::response::OutgoingResponse;

static STATUS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(HTTP (\d{3})\)").expect("status pattern compiles"));

/// Find an `(HTTP nnn)` marker in diagnostic output.
pub fn embedded_status(stderr: &[u8]) -> Option<StatusCode> {
    let captures = STATUS_PATTERN.captures(stderr)?;
    let digits = std::str::from_utf8(captures.get(1)?.as_bytes()).ok()?;
    let code = digits.parse::<u16>().ok()?;
    StatusCode::from_u16(code).ok()
}

/// Turn a finished run into a response.
///
/// A successful run answers 200 with stdout. A failed run answers the status
/// embedded in stderr with whatever the program printed to stdout, or 400 with
/// an empty body when stderr names no status.
pub fn resolve_status(result: ProcessResult) -> OutgoingResponse {
    if result.success {
        return OutgoingResponse::new(StatusCode::OK, result.stdout);
    }

    match embedded_status(&result.stderr) {
        Some(status) => OutgoingResponse::new(status, result.stdout),
        None => {
            tracing::debug!(
                stderr = %String::from_utf8_lossy(&result.stderr),
                "Program failed without an HTTP status"
            );
            OutgoingResponse::new(StatusCode::BAD_REQUEST, Vec::new())
        }
    }
}
