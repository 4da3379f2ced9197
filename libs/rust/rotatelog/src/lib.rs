//! Rotating log files for platform Rust services.
//!
//! This crate provides:
//! - A writer that switches files by time bucket and size threshold
//! - Retention by file age or file count
//! - An atomically swapped symlink to the current file
//! - A marker-file lock coordinating rotators across processes
//! - Rotation events delivered off the write path
//! - Tracing subscriber setup using the writer as a sink

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod lock;
pub mod pattern;
pub mod policy;
pub mod retention;
pub mod settings;
pub mod symlink;
pub mod tracing_config;
pub mod writer;

pub use clock::{Clock, LocalClock, OffsetClock, UtcClock};
pub use config::{DEFAULT_MAX_AGE, DEFAULT_ROTATION_TIME, RotateConfig};
pub use error::RotateError;
pub use event::{EventType, Handler, RotationEvent};
pub use pattern::FilePattern;
pub use retention::Retention;
pub use settings::RotateSettings;
pub use tracing_config::{TracingConfig, init_tracing};
pub use writer::RotatingWriter;
