//! Error status - how a caller should react to an error

use std::fmt;

/// Whether an error is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    /// Retrying will reproduce the same failure
    Permanent,
    /// The operation may succeed if retried
    Temporary,
    /// Was temporary, but retries have been exhausted
    Persistent,
}

impl ErrorStatus {
    /// Check if the status allows a retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorStatus::Temporary)
    }

    /// Transition after failed retries: Temporary becomes Persistent
    pub fn persist(self) -> Self {
        match self {
            ErrorStatus::Temporary => ErrorStatus::Persistent,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Permanent => "permanent",
            ErrorStatus::Temporary => "temporary",
            ErrorStatus::Persistent => "persistent",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
