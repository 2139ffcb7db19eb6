//! Error types for session logging.
//!
//! All failures in this crate are storage-shaped: a mount that never came up,
//! a directory that could not be created, a file that could not be opened,
//! written, or removed. None of them are fatal to the host — the worst case
//! is bounded, observable data loss, never a crash.
//!
//! ## Taxonomy
//!
//! - **Unavailable**: the storage volume failed to mount at `init` time.
//!   Every later call on the logger becomes a no-op until a successful re-init.
//! - **DirectoryCreate / FileOpen / FileWrite / FileRemove**: failures during
//!   session start (which aborts the session start) or during a drain pass
//!   (which aborts only that pass; queued entries are retained).
//!
//! A full write buffer is deliberately *not* an error: producers must never be
//! forced to handle backpressure synchronously, so rejected entries only bump
//! the drop counter (see [`crate::WriteBuffer::dropped`]).
//!
//! ```rust
//! use laplog::LoggerError;
//!
//! let err = LoggerError::unavailable("card not inserted");
//! if err.is_transient() {
//!     // retrying init later may succeed
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for logger operations.
pub type Result<T, E = LoggerError> = std::result::Result<T, E>;

/// Main error type for session logging operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LoggerError {
    #[error("Storage volume unavailable: {reason}")]
    Unavailable {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to create directory: {path}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open file for append: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file: {path}")]
    FileRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("No active session (call start_new_session first)")]
    NoSession,
}

impl LoggerError {
    /// Returns whether retrying the failed operation later may succeed.
    ///
    /// Storage faults on removable media are usually transient (card
    /// reseated, bus glitch); a missing session is a caller ordering bug.
    pub fn is_transient(&self) -> bool {
        match self {
            LoggerError::Unavailable { .. } => true,
            LoggerError::DirectoryCreate { .. } => true,
            LoggerError::FileOpen { .. } => true,
            LoggerError::FileWrite { .. } => true,
            LoggerError::FileRemove { .. } => true,
            LoggerError::Config { .. } => false,
            LoggerError::NoSession => false,
        }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        LoggerError::Config { reason: reason.into() }
    }

    /// Helper constructor for mount/init failures.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        LoggerError::Unavailable { reason: reason.into(), source: None }
    }

    /// Helper constructor for mount/init failures with an io source.
    pub fn unavailable_with_source(reason: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::Unavailable { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for directory creation failures.
    pub fn dir_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::DirectoryCreate { path: path.into(), source }
    }

    /// Helper constructor for file open failures.
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::FileOpen { path: path.into(), source }
    }

    /// Helper constructor for file write failures.
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::FileWrite { path: path.into(), source }
    }

    /// Helper constructor for file removal failures.
    pub fn file_remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::FileRemove { path: path.into(), source }
    }
}
