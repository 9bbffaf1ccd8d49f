//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs / http::transport):
//!     Load config → Validate → Resolve program → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or explicit trigger → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: a missing program is a startup error, never a per-request one
//! - In-flight invocations finish (or time out) before the server stops

pub mod shutdown;

pub use shutdown::{signalled, Shutdown};
