//! HTTP transport backed by the `gh` command line.
//!
//! REST clients talk to a loopback server; each request becomes one
//! `gh api` invocation and the program's output becomes the response,
//! including emulated pagination and upstream status codes.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod response;
pub mod translate;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use http::{HttpServer, LocalTransport};
pub use lifecycle::Shutdown;
