//! Scene error types
//!
//! Re-exports referit-error so downstream crates can depend on
//! `referit_scene` alone.

pub use referit_error::{Error, ErrorKind, ErrorStatus, Result};
