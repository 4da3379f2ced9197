//! Error types for log-pipe.

use platform_errs::{CodeError, predefined};
use platform_rotatelog::RotateError;
use thiserror::Error;

/// Errors that stop the pipe.
#[derive(Error, Debug)]
pub enum PipeError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] RotateError),

    /// Reading the input failed
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),
}

impl PipeError {
    /// Coded form for structured exit logging.
    #[must_use]
    pub fn to_code_error(&self) -> CodeError {
        match self {
            Self::Config(err) => err.to_code_error(),
            Self::Read(err) => predefined::internal_server().with_detail(&err.to_string()),
        }
    }
}
