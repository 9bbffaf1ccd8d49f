//! Request translation subsystem.
//!
//! # Data Flow
//! ```text
//! IncomingRequest
//!     → request.rs (method check, page extraction, endpoint)
//!     → body.rs (POST/PATCH only: flags or piped input)
//!     → Translation { CommandSpec, PageContext }
//! ```

pub mod body;
pub mod request;

pub use body::{encode_body, BodyShape};
pub use request::{
    CommandSpec, IncomingRequest, PageContext, Translation, Translator, DEFAULT_PER_PAGE,
    PAGINATE_FLAG,
};
