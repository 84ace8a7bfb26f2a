//! Error kinds for referit operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to tell a malformed scene apart from a query
/// that simply has no unique answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration or parameters
    ConfigInvalid,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Scene index errors
    // =========================================================================
    /// Two scene objects share the same id
    DuplicateId,

    /// A bounding box has a negative or non-finite component
    InvalidBox,

    /// The requested object (by id or label) is not in the scene
    NotFound,

    // =========================================================================
    // Resolution errors
    // =========================================================================
    /// No object carries the target label
    NoCandidates,

    /// A label anchor matches more than one object
    AmbiguousAnchor,

    /// Anchor count does not match the relation
    Arity,

    /// Two or more candidates score equal within tolerance
    AmbiguousResult,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Failed to parse input
    ParseFailed,

    /// Serialization/deserialization failed
    SerializationFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::InvalidArgument => "InvalidArgument",

            // Scene index
            ErrorKind::DuplicateId => "DuplicateId",
            ErrorKind::InvalidBox => "InvalidBox",
            ErrorKind::NotFound => "NotFound",

            // Resolution
            ErrorKind::NoCandidates => "NoCandidates",
            ErrorKind::AmbiguousAnchor => "AmbiguousAnchor",
            ErrorKind::Arity => "Arity",
            ErrorKind::AmbiguousResult => "AmbiguousResult",

            // IO
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",

            // Parse
            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::SerializationFailed => "SerializationFailed",
        }
    }

    /// Check if this error kind is retryable by default.
    ///
    /// Resolution is a pure computation, so only transient IO qualifies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::IoFailed)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::DuplicateId.to_string(), "DuplicateId");
        assert_eq!(ErrorKind::AmbiguousResult.to_string(), "AmbiguousResult");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::IoFailed.is_retryable());
        assert!(!ErrorKind::NoCandidates.is_retryable());
        assert!(!ErrorKind::AmbiguousResult.is_retryable());
        assert!(!ErrorKind::FileNotFound.is_retryable());
    }
}
