//! Coded errors for platform Rust services.
//!
//! This crate provides:
//! - Stack capture at wrap time, rendered lazily into readable traces
//! - Plain errors built from a message and key/value context
//! - Coded errors with an accumulating detail string
//! - A registry of parent/child code relations for hierarchical matching
//! - A wrapper that adds context text while keeping the source chain intact
//! - Predefined platform codes and panic conversion
//!
//! Every error here implements [`std::error::Error`], so `source()` is the
//! unwrap chain. [`unwrap_root`] and [`find`] walk that chain the same way
//! for every variant.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod code;
pub mod global;
pub mod kv;
pub mod panic;
pub mod plain;
pub mod predefined;
pub mod relation;
pub mod stack;
pub mod wrapper;

use std::error::Error as StdError;
use std::fmt;

pub use code::CodeError;
pub use global::default_relation;
pub use panic::{catch, from_panic, from_panic_with};
pub use plain::PlainError;
pub use relation::CodeRelation;
pub use stack::{Frame, Stack, StackError};
pub use wrapper::ErrorWrapper;

/// Boxed error accepted by the wrapping helpers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Frames hidden above [`StackError::capture_with`]: the public helper itself.
pub(crate) const STACK_SKIP: usize = 1;

/// Shared capability of the plain, coded and wrapped error variants.
///
/// `is` is a shallow identity match defined per variant; chain-aware
/// matching goes through [`find`] or [`unwrap_root`].
pub trait BaseError: StdError + Send + Sync + Sized + 'static {
    /// Returns `true` if `target` is considered the same error as `self`.
    fn is(&self, target: &(dyn StdError + 'static)) -> bool;

    /// Attach a stack capture to this error.
    #[inline(never)]
    fn wrap(self) -> StackError {
        StackError::capture_with(self, STACK_SKIP)
    }

    /// Attach `msg` and flattened key/value pairs as context, then capture
    /// the stack.
    #[inline(never)]
    fn wrap_msg(self, msg: &str, kv: &[&dyn fmt::Display]) -> StackError {
        StackError::capture_with(ErrorWrapper::new(self, kv::render(msg, kv)), STACK_SKIP)
    }
}

/// Attach a stack capture to any error.
#[inline(never)]
pub fn wrap<E>(err: E) -> StackError
where
    E: Into<BoxError>,
{
    StackError::capture_with(err, STACK_SKIP)
}

/// Add `msg` and key/value context to any error, then capture the stack.
#[inline(never)]
pub fn wrap_msg<E>(err: E, msg: &str, kv: &[&dyn fmt::Display]) -> StackError
where
    E: Into<BoxError>,
{
    StackError::capture_with(ErrorWrapper::new(err, kv::render(msg, kv)), STACK_SKIP)
}

/// Follow `source()` to the innermost error of the chain.
#[must_use]
pub fn unwrap_root<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current
}

/// Return the first error of type `T` in the chain starting at `err`.
#[must_use]
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<T>() {
            return Some(found);
        }
        current = e.source();
    }
    None
}
