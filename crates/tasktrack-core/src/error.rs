//! Error types for the tracker.

use crate::model::TaskId;
use thiserror::Error;

/// Errors produced by tracker operations.
///
/// Every variant is reported synchronously to the caller; nothing is retried.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Malformed or out-of-range input (short password, past date, overlong text).
    #[error("{0}")]
    Validation(String),

    /// The login is already registered.
    #[error("{0}")]
    Conflict(String),

    /// No user with the given login.
    #[error("User with username '{0}' doesn't exist")]
    UserNotFound(String),

    /// No task with the given id.
    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    /// The requester does not own the task.
    #[error("{0}")]
    Forbidden(String),

    /// Password verification failed.
    #[error("Incorrect password")]
    InvalidCredential,

    /// Missing or unparseable bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Whether the error is the caller's fault rather than the server's.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Internal(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
