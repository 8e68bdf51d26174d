//! Error types for `pag-off-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for ticket store operations.
#[derive(Error, Debug)]
pub enum PagOffError {
    // === Store Errors ===
    /// The ticket directory is missing or cannot be read.
    #[error("Ticket store unavailable at '{}': {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    /// A single ticket file could not be parsed.
    #[error("Malformed ticket file '{}': {reason}", path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    /// No ticket in the directory carries the requested id.
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    // === Validation Errors ===
    /// Status filter outside `open`, `closed`, `all`.
    #[error("Invalid status: {status} (expected one of: open, closed, all)")]
    InvalidStatus { status: String },

    /// Sort order outside `older`, `newer`.
    #[error("Invalid order: {order} (expected one of: older, newer)")]
    InvalidOrder { order: String },

    /// Close status not present anywhere in the project.
    #[error("Invalid close status '{value}', expected one of: {}", allowed.join(", "))]
    InvalidCloseStatus { value: String, allowed: Vec<String> },

    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Version Control Errors ===
    /// An external command exited non-zero or could not be started.
    #[error("The command \"{command}\" failed with \"{stderr}\"")]
    CommandFailed { command: String, stderr: String },

    // === Operational Errors ===
    /// The operator interrupted the running operation.
    #[error("Interrupted by user")]
    Interrupted,

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PagOffError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn store_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type using `PagOffError`.
pub type Result<T> = std::result::Result<T, PagOffError>;
