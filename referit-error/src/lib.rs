//! # referit-error
//!
//! Unified error handling for referit.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what went wrong (e.g., DuplicateId, AmbiguousResult)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Locate the cause with key-value context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use referit_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::NoCandidates, "no object labeled 'chair'")
//!         .with_operation("resolver::resolve")
//!         .with_context("target_label", "chair"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, referit_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Resolution failures are deterministic and never retryable

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using referit Error
pub type Result<T> = std::result::Result<T, Error>;
