//! External program subsystem.
//!
//! The only place where a real side effect happens: everything upstream is a
//! pure translation, everything downstream a pure reconstruction.

pub mod invoker;

pub use invoker::{ProcessResult, Program};
