//! Error types for rotating log files.
//!
//! Every variant maps onto the platform code table so callers that only
//! understand [`CodeError`] can still classify rotation failures.

use std::io;
use std::path::{Path, PathBuf};

use platform_errs::{CodeError, predefined};
use thiserror::Error;

/// Errors raised by the rotating writer and its configuration.
#[derive(Error, Debug)]
pub enum RotateError {
    /// Construction parameters are inconsistent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The file name pattern is not a valid strftime pattern
    #[error("invalid strftime pattern {pattern:?}")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
    },

    /// A file system operation failed
    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        /// Operation name, e.g. `open` or `rename symlink`
        op: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Another rotator holds the lock for the target file
    #[error("rotation lock {} is held by another rotator", path.display())]
    LockContention {
        /// Path of the lock marker
        path: PathBuf,
    },

    /// The writer was closed
    #[error("rotating writer is closed")]
    Closed,
}

impl RotateError {
    /// Create an I/O error for `op` on `path`.
    pub fn io(op: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Platform code for this error.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::InvalidPattern { .. } => predefined::ARGS_ERROR,
            Self::Io { .. } | Self::LockContention { .. } | Self::Closed => {
                predefined::SERVER_INTERNAL_ERROR
            }
        }
    }

    /// Convert into a coded error whose detail is this error's message.
    #[must_use]
    pub fn to_code_error(&self) -> CodeError {
        let base = match self {
            Self::InvalidArgument(_) | Self::InvalidPattern { .. } => predefined::args(),
            _ => predefined::internal_server(),
        };
        base.with_detail(&self.to_string())
    }

    /// Returns `true` if the failure is expected to clear on a later attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::LockContention { .. })
    }
}

impl From<RotateError> for io::Error {
    fn from(err: RotateError) -> Self {
        let kind = match &err {
            RotateError::Io { source, .. } => source.kind(),
            RotateError::InvalidArgument(_) | RotateError::InvalidPattern { .. } => {
                io::ErrorKind::InvalidInput
            }
            RotateError::LockContention { .. } => io::ErrorKind::WouldBlock,
            RotateError::Closed => io::ErrorKind::BrokenPipe,
        };
        Self::new(kind, err)
    }
}
