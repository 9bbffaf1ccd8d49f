//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! REST client
//!     → transport.rs (loopback listener + client bound to it)
//!     → server.rs (Axum setup, request ID, body limit)
//!     → translate → process → response
//!     → Send to client
//! ```

pub mod server;
pub mod transport;

pub use server::{AppState, HttpServer, X_REQUEST_ID};
pub use transport::LocalTransport;
