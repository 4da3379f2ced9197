//! Shared test utilities for platform Rust libraries.
//!
//! This crate provides:
//! - Proptest generators for codes, messages and file patterns
//! - Controllable clock and rotation event recorder
//! - File system fixtures for rotation scenarios

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use fixtures::{LogDir, touch_with_mtime, wait_until};
pub use generators::*;
pub use mocks::{EventRecorder, ManualClock};
