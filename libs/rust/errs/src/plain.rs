//! Plain errors: a message plus optional key/value context.

use std::error::Error as StdError;
use std::fmt;

use crate::{BaseError, find, kv};

/// An error carrying only text.
///
/// Two plain errors are the same error when their rendered text matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlainError {
    text: String,
}

impl PlainError {
    /// Create a plain error from `msg` and flattened key/value pairs.
    ///
    /// ```
    /// use platform_errs::PlainError;
    ///
    /// let err = PlainError::new("config missing", &[&"key", &"log.path"]);
    /// assert_eq!(err.to_string(), "config missing, key=log.path");
    /// ```
    #[must_use]
    pub fn new(msg: &str, kv: &[&dyn fmt::Display]) -> Self {
        Self {
            text: kv::render(msg, kv),
        }
    }

    /// The rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl StdError for PlainError {}

impl BaseError for PlainError {
    fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        find::<Self>(target).is_some_and(|t| t.text == self.text)
    }
}

impl From<&str> for PlainError {
    fn from(msg: &str) -> Self {
        Self::new(msg, &[])
    }
}
