//! Context wrapper for arbitrary errors.

use std::error::Error as StdError;
use std::fmt;

use crate::{BaseError, BoxError, find};

/// Adds context text to an inner error.
///
/// Renders as `"<inner> <text>"`, always with the separating space.
/// `source()` returns the inner error, so nested wrappers still unwrap to
/// the original failure.
pub struct ErrorWrapper {
    inner: BoxError,
    text: String,
}

impl ErrorWrapper {
    /// Wrap `inner` with `text`.
    pub fn new<E>(inner: E, text: impl Into<String>) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: inner.into(),
            text: text.into(),
        }
    }

    /// The context text added by this wrapper.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.as_ref()
    }
}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.inner, self.text)
    }
}

impl fmt::Debug for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorWrapper")
            .field("inner", &self.inner)
            .field("text", &self.text)
            .finish()
    }
}

impl StdError for ErrorWrapper {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl BaseError for ErrorWrapper {
    /// Compares only the text of the first wrapper found in `target`; the
    /// inner errors are not consulted.
    fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        find::<Self>(target).is_some_and(|t| t.text == self.text)
    }
}
