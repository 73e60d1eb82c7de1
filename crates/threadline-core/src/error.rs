//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

use crate::comment::CommentId;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // ─────────────────────────────────────────────────────────────
    // Comment Lifecycle Errors
    // ─────────────────────────────────────────────────────────────
    /// Rejected client-side before any request is issued
    #[error("{message}")]
    Validation { message: String },

    /// Any non-success outcome of a create/edit/delete request
    #[error("Request failed: {message}")]
    Request { message: String },

    /// The user declined a discarding or destructive confirmation
    #[error("Confirmation declined")]
    ConfirmationDeclined,

    #[error("Comment has not been saved yet")]
    NotPersisted,

    #[error("Comment can no longer be edited")]
    NotEditable,

    #[error("Thread already contains comment {id}")]
    DuplicateComment { id: CommentId },

    #[error("No such comment in this thread")]
    UnknownComment,

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Thread seed not found: {path}")]
    SeedNotFound { path: PathBuf },

    #[error("Signal handling error: {message}")]
    Signal { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn signal(message: impl Into<String>) -> Self {
        Self::Signal {
            message: message.into(),
        }
    }

    pub fn seed_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SeedNotFound { path: path.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors are handled by the component that issued the
    /// operation; the user may always retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. }
                | Error::Request { .. }
                | Error::ConfirmationDeclined
        )
    }

    /// Check if this error should abort startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::SeedNotFound { .. } | Error::Url(_)
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
