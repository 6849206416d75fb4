//! Error types for the activity tracker.
//!
//! The scheduling core in [`crate::schedule`] is total and never returns
//! these; they come from persistence, configuration, and host-level checks.

use chrono::NaiveDate;

/// Top-level error type for the tracker host layer.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Activity table load/save error.
    #[error("activity store error: {0}")]
    Store(String),

    /// Completion ledger read/append/archive error.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No activity matches the given id or name.
    #[error("activity not found: {0}")]
    ActivityNotFound(String),

    /// A dependency name does not refer to any known activity.
    #[error("unknown dependency: {0}")]
    UnknownDependency(String),

    /// Completion refused because prerequisites are not done today.
    #[error("cannot complete '{activity}': waiting on {}", .pending.join(", "))]
    DependenciesPending {
        activity: String,
        pending: Vec<String>,
    },

    /// Completion refused because the activity is already logged for the date.
    #[error("'{activity}' is already completed for {date}")]
    AlreadyCompleted { activity: String, date: NaiveDate },

    /// Caller supplied an invalid value.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TrackerError>;
