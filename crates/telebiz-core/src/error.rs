//! Error types for the core components.

use thiserror::Error;

/// Reminder-time resolution failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// No rule matched the input.
    #[error("could not parse reminder time: \"{0}\"")]
    Unparseable(String),
}

/// Errors from building forms or loading the form catalog.
#[derive(Error, Debug)]
pub enum FormError {
    /// Fields depend on each other in a loop.
    #[error("dependency cycle detected: {0}")]
    DependencyCycle(String),

    /// Catalog contents are inconsistent.
    #[error("invalid form catalog: {0}")]
    Catalog(String),

    /// I/O error reading a catalog file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed catalog JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// In-flight guard rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The same logical action is already running.
    #[error("action already in progress: {0}")]
    AlreadyInFlight(String),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
