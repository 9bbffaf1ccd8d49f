//! Request translation into `gh api` argument lists.
//!
//! # Responsibilities
//! - Accept only GET, POST, PATCH and DELETE
//! - Strip `page`/`per_page` from read requests and ask the program to paginate
//! - Delegate write bodies to the body encoder
//!
//! # Design Decisions
//! - Translation is a pure function of the request; the same request always
//!   yields the same `CommandSpec`
//! - Pagination parameters are only stripped when `page` is present, so a lone
//!   `per_page` still reaches the upstream API

use axum::body::Bytes;
use axum::http::{Method, Uri};
use url::form_urlencoded;

use crate::error::{TransportError, TransportResult};
use crate::translate::body::encode_body;

/// Page size used when a page is requested without a positive `per_page`.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Flag asking the program to fetch and concatenate every page.
pub const PAGINATE_FLAG: &str = "--paginate";

/// An inbound HTTP request, reduced to what translation needs.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    /// Request path including the leading `/`.
    pub path: String,
    /// Raw query string as received, without the `?`.
    pub raw_query: Option<String>,
    /// Decoded query parameters in arrival order.
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl IncomingRequest {
    /// Build a request from its method, URI and (possibly empty) body.
    pub fn new(method: Method, uri: &Uri, body: Bytes) -> Self {
        let raw_query = uri.query().map(str::to_string);
        let query = raw_query
            .as_deref()
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Self {
            method,
            path: uri.path().to_string(),
            raw_query,
            query,
            body: if body.is_empty() { None } else { Some(body) },
        }
    }
}

/// Arguments and optional stdin payload for one program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

impl CommandSpec {
    fn api(method: &Method, endpoint: String) -> Self {
        Self {
            args: vec![
                "api".to_string(),
                "-X".to_string(),
                method.as_str().to_string(),
                endpoint,
            ],
            stdin: None,
        }
    }
}

/// Pagination requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Requested page, 0 when pagination was not requested.
    pub page: u32,
    /// Page size advertised in continuation links, always positive.
    pub per_page: u32,
    path: String,
    forwarded: Vec<(String, String)>,
}

impl PageContext {
    fn none(path: &str, forwarded: Vec<(String, String)>) -> Self {
        Self {
            page: 0,
            per_page: 0,
            path: path.to_string(),
            forwarded,
        }
    }

    pub fn is_requested(&self) -> bool {
        self.page > 0
    }

    /// Request URI of `page` with the same query and the resolved page size.
    pub fn uri_for(&self, page: u32) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.extend_pairs(self.forwarded.iter());
        query.append_pair("page", &page.to_string());
        query.append_pair("per_page", &self.per_page.to_string());
        format!("{}?{}", self.path, query.finish())
    }

    /// `Link` header value pointing at the page after the requested one.
    pub fn next_link(&self) -> String {
        format!("<{}>; rel=\"next\"", self.uri_for(self.page + 1))
    }
}

/// Output of translating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub command: CommandSpec,
    pub page: PageContext,
}

/// Translates requests into program invocations.
#[derive(Debug, Clone)]
pub struct Translator {
    default_per_page: u32,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Translator {
    pub fn new(default_per_page: u32) -> Self {
        Self {
            default_per_page: default_per_page.max(1),
        }
    }

    /// Map a request onto `gh api` arguments.
    pub fn translate(&self, request: &IncomingRequest) -> TransportResult<Translation> {
        let method = &request.method;
        if *method == Method::GET || *method == Method::DELETE {
            let page = self.page_context(request)?;
            let endpoint = endpoint(&request.path, &page.forwarded);
            let mut command = CommandSpec::api(method, endpoint);
            if page.is_requested() {
                command.args.push(PAGINATE_FLAG.to_string());
            }
            Ok(Translation { command, page })
        } else if *method == Method::POST || *method == Method::PATCH {
            let mut endpoint = request.path.trim_start_matches('/').to_string();
            if let Some(query) = &request.raw_query {
                endpoint.push('?');
                endpoint.push_str(query);
            }
            let mut command = CommandSpec::api(method, endpoint);
            encode_body(request.body.as_deref().unwrap_or_default(), &mut command)?;
            Ok(Translation {
                command,
                page: PageContext::none(&request.path, request.query.clone()),
            })
        } else {
            Err(TransportError::UnsupportedMethod(method.clone()))
        }
    }

    fn page_context(&self, request: &IncomingRequest) -> TransportResult<PageContext> {
        let Some(raw_page) = first_value(&request.query, "page") else {
            return Ok(PageContext::none(&request.path, request.query.clone()));
        };

        let page = parse_number("page", raw_page)?;
        let requested_per_page = match first_value(&request.query, "per_page") {
            Some(raw) => parse_number("per_page", raw)?,
            None => 0,
        };
        let forwarded: Vec<_> = request
            .query
            .iter()
            .filter(|(k, _)| k != "page" && k != "per_page")
            .cloned()
            .collect();

        if page <= 0 {
            return Ok(PageContext::none(&request.path, forwarded));
        }

        let per_page = match u32::try_from(requested_per_page) {
            Ok(size) if size > 0 => size,
            _ => self.default_per_page,
        };

        Ok(PageContext {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            per_page,
            path: request.path.clone(),
            forwarded,
        })
    }
}

fn first_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_number(key: &str, value: &str) -> TransportResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| TransportError::MalformedQuery(format!("{key}={value}: {e}")))
}

fn endpoint(path: &str, query: &[(String, String)]) -> String {
    let path = path.trim_start_matches('/');
    if query.is_empty() {
        return path.to_string();
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(query.iter());
    format!("{}?{}", path, serializer.finish())
}
