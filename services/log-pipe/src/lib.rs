//! log-pipe: copies standard input into rotating log files.
//!
//! Settings come from `LOG_PIPE_*` environment variables. SIGHUP forces a
//! rotation; end of input or Ctrl-C closes the current file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod pump;

pub use config::{ENV_PREFIX, PipeConfig};
pub use error::PipeError;
pub use pump::{Command, PumpStats, pump};
