//! Single-page emulation over concatenated paginated output.
//!
//! With `--paginate` the program fetches every page and prints the page
//! bodies back to back (`[...][...][...]`), which is not one JSON document.
//! This module recovers the page the caller asked for and advertises the
//! next one through a `Link` header, as the upstream API would.
//!
//! # Design Decisions
//! - Page boundaries come from a streaming JSON scan, so data that happens to
//!   contain `}][{` cannot split a page
//! - Output that is not a stream of JSON values is treated as one page
//! - A page past the last one answers `[]` without a `Link` header

use serde::de::IgnoredAny;

use crate::translate::PageContext;

/// Body returned for a page past the last one.
pub const EMPTY_PAGE: &[u8] = b"[]";

/// Split concatenated JSON output into per-page byte slices.
///
/// Returns a single fragment holding the whole input when it is not a
/// well-formed sequence of JSON values.
pub fn page_fragments(stdout: &[u8]) -> Vec<&[u8]> {
    let mut stream = serde_json::Deserializer::from_slice(stdout).into_iter::<IgnoredAny>();
    let mut fragments = Vec::new();
    let mut start = 0;

    while let Some(value) = stream.next() {
        if value.is_err() {
            return vec![stdout];
        }
        let end = stream.byte_offset();
        fragments.push(stdout[start..end].trim_ascii());
        start = end;
    }

    if fragments.is_empty() {
        return vec![stdout];
    }
    fragments
}

/// Reconstruct the requested page from `stdout`.
///
/// Returns the body and, when more pages follow, the `Link` header value.
pub fn emulate_page(stdout: Vec<u8>, page: &PageContext) -> (Vec<u8>, Option<String>) {
    if !page.is_requested() {
        return (stdout, None);
    }

    let fragments = page_fragments(&stdout);
    let total = fragments.len();
    if total <= 1 {
        return (stdout, None);
    }

    let requested = page.page as usize;
    if requested > total {
        tracing::debug!(page = requested, pages = total, "Requested page past the last one");
        return (EMPTY_PAGE.to_vec(), None);
    }

    let body = fragments[requested - 1].to_vec();
    let link = (requested < total).then(|| page.next_link());

    tracing::debug!(page = requested, pages = total, has_next = link.is_some(), "Emulated page");

    (body, link)
}
