//! The main Error type for referit

use crate::{ErrorKind, ErrorStatus};
use std::fmt;

/// The unified error type for all referit operations.
///
/// Carries what went wrong (`kind`), whether to retry (`status`), where it
/// happened (`operation`), and key-value `context` naming the offending ids
/// or labels.
///
/// # Example
///
/// ```rust
/// use referit_error::{Error, ErrorKind, ErrorStatus};
///
/// let err = Error::new(ErrorKind::AmbiguousResult, "2 candidates tie at distance 1.5")
///     .with_operation("resolver::select")
///     .with_context("candidates", "3, 4");
///
/// assert_eq!(err.kind(), ErrorKind::AmbiguousResult);
/// assert_eq!(err.status(), ErrorStatus::Permanent);
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        };

        Self {
            kind,
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// The innermost operation reported last, e.g. `index::build`
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Look up the first context value stored under `key`
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the operation that produced this error.
    ///
    /// A previously set operation is kept in context under "called".
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }

    /// Mark as persistent after failed retries
    pub fn persist(mut self) -> Self {
        self.status = self.status.persist();
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }
}

// =============================================================================
// Display - compact, single-line format for logs
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.status)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Raw conversions (only at file boundaries)
// =============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_io() {
            ErrorKind::IoFailed
        } else {
            ErrorKind::ParseFailed
        };
        Error::new(kind, err.to_string())
            .with_operation("json")
            .with_context("line", err.line().to_string())
            .with_context("column", err.column().to_string())
            .set_source(err)
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    /// Two objects in one scene share `id`
    pub fn duplicate_id(id: u32) -> Self {
        Self::new(ErrorKind::DuplicateId, format!("object id {} appears more than once", id))
            .with_context("id", id.to_string())
    }

    /// Object `id` has a malformed bounding box
    pub fn invalid_box(id: u32, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidBox, reason).with_context("id", id.to_string())
    }

    pub fn object_not_found(id: u32) -> Self {
        Self::new(ErrorKind::NotFound, format!("object {} not found", id))
            .with_context("id", id.to_string())
    }

    pub fn label_not_found(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(ErrorKind::NotFound, format!("no object labeled '{}'", label))
            .with_context("label", label)
    }

    pub fn no_candidates(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(ErrorKind::NoCandidates, format!("no candidate labeled '{}'", label))
            .with_context("target_label", label)
    }

    pub fn ambiguous_anchor(label: impl Into<String>, matches: usize) -> Self {
        let label = label.into();
        Self::new(
            ErrorKind::AmbiguousAnchor,
            format!("anchor '{}' matches {} objects", label, matches),
        )
        .with_context("label", label)
        .with_context("matches", matches.to_string())
    }

    pub fn arity(relation: impl Into<String>, expected: usize, got: usize) -> Self {
        let relation = relation.into();
        Self::new(
            ErrorKind::Arity,
            format!("{} takes {} anchor(s), got {}", relation, expected, got),
        )
        .with_context("relation", relation)
        .with_context("expected", expected.to_string())
        .with_context("got", got.to_string())
    }

    /// Several candidates tie for the best score
    pub fn ambiguous_result(ids: &[u32], score: f64) -> Self {
        let ids = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            ErrorKind::AmbiguousResult,
            format!("candidates [{}] tie at distance {:.6}", ids, score),
        )
        .with_context("candidates", ids)
    }
}
