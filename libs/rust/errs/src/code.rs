//! Coded errors.
//!
//! A [`CodeError`] classifies a failure with a numeric code. The code and
//! message never change; context accumulates in the detail string through
//! [`CodeError::with_detail`] and [`BaseError::wrap_msg`], both of which
//! return new values.

use std::error::Error as StdError;
use std::fmt;

use crate::relation::CodeRelation;
use crate::{BaseError, STACK_SKIP, StackError, default_relation, kv, unwrap_root};

/// Separator placed between accumulated detail segments.
const DETAIL_SEPARATOR: &str = ", ";

/// An error with a numeric code, a message and accumulated detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeError {
    code: i32,
    msg: String,
    detail: String,
}

impl CodeError {
    /// Create a coded error with empty detail.
    #[must_use]
    pub fn new(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            detail: String::new(),
        }
    }

    pub(crate) fn with_parts(code: i32, msg: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            detail: detail.into(),
        }
    }

    /// The error code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// The error message.
    #[must_use]
    pub fn msg(&self) -> &str {
        &self.msg
    }

    /// The accumulated detail, empty if none was added.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Return a copy with `detail` appended.
    ///
    /// Segments are joined with `", "`. Appending an empty string returns an
    /// unchanged copy. `self` is never modified.
    ///
    /// ```
    /// use platform_errs::CodeError;
    ///
    /// let base = CodeError::new(1000, "x");
    /// let err = base.with_detail("a").with_detail("b");
    /// assert_eq!(err.detail(), "a, b");
    /// assert_eq!(base.detail(), "");
    /// ```
    #[must_use]
    pub fn with_detail(&self, detail: &str) -> Self {
        let mut next = self.clone();
        next.append_detail(detail);
        next
    }

    fn append_detail(&mut self, detail: &str) {
        if detail.is_empty() {
            return;
        }
        if !self.detail.is_empty() {
            self.detail.push_str(DETAIL_SEPARATOR);
        }
        self.detail.push_str(detail);
    }

    /// Returns `true` if the innermost error of `target` is a coded error
    /// whose code equals this code or descends from it in `relation`.
    #[must_use]
    pub fn matches(&self, target: &(dyn StdError + 'static), relation: &CodeRelation) -> bool {
        unwrap_root(target)
            .downcast_ref::<Self>()
            .is_some_and(|other| relation.is(self.code, other.code))
    }
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.msg)?;
        if !self.detail.is_empty() {
            write!(f, " {}", self.detail)?;
        }
        Ok(())
    }
}

impl StdError for CodeError {}

impl BaseError for CodeError {
    /// Matches through the process-wide [`default_relation`]; use
    /// [`CodeError::matches`] to consult a specific registry.
    fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        self.matches(target, default_relation())
    }

    /// Unlike the other variants, the context lands in a copy of the detail
    /// rather than in a wrapper, so the coded error stays the root.
    #[inline(never)]
    fn wrap_msg(self, msg: &str, kv: &[&dyn fmt::Display]) -> StackError {
        let mut next = self;
        if !msg.is_empty() || !kv.is_empty() {
            next.append_detail(&kv::render(msg, kv));
        }
        StackError::capture_with(next, STACK_SKIP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorWrapper, find};

    #[test]
    fn test_display_without_detail() {
        let err = CodeError::new(1001, "ArgsError");
        assert_eq!(err.to_string(), "1001 ArgsError");
    }

    #[test]
    fn test_display_with_detail() {
        let err = CodeError::new(1001, "ArgsError").with_detail("name empty");
        assert_eq!(err.to_string(), "1001 ArgsError name empty");
    }

    #[test]
    fn test_with_detail_accumulates() {
        let err = CodeError::new(1000, "x").with_detail("a").with_detail("b");
        assert_eq!(err.detail(), "a, b");
    }

    #[test]
    fn test_with_empty_detail_is_noop_copy() {
        let err = CodeError::new(1000, "x").with_detail("a");
        let same = err.with_detail("");
        assert_eq!(same, err);
    }

    #[test]
    fn test_with_detail_leaves_receiver_untouched() {
        let base = CodeError::new(1000, "x").with_detail("a");
        let _next = base.with_detail("b");
        assert_eq!(base.detail(), "a");
    }

    #[test]
    fn test_is_same_code_different_message() {
        let a = CodeError::new(1234, "first");
        let b = CodeError::new(1234, "second");
        assert!(a.is(&b));
    }

    #[test]
    fn test_is_different_code_unrelated() {
        let a = CodeError::new(1234, "first");
        let b = CodeError::new(4321, "first");
        assert!(!a.is(&b));
    }

    #[test]
    fn test_is_type_mismatch() {
        let a = CodeError::new(1234, "first");
        assert!(!a.is(&std::io::Error::other("first")));
    }

    #[test]
    fn test_matches_uses_given_relation() {
        let relation = CodeRelation::new();
        relation.add(&[9100, 9101]).unwrap();
        let parent = CodeError::new(9100, "parent");
        let child = CodeError::new(9101, "child");
        assert!(parent.matches(&child, &relation));
        assert!(!child.matches(&parent, &relation));
        assert!(!parent.matches(&child, &CodeRelation::new()));
    }

    #[test]
    fn test_is_sees_through_stack_and_wrapper() {
        let inner = CodeError::new(1004, "RecordNotFoundError");
        let err = ErrorWrapper::new(inner.clone().wrap(), "loading user");
        assert!(inner.is(&err));
    }

    #[test]
    fn test_wrap_msg_appends_to_cloned_detail() {
        let original = CodeError::new(1001, "ArgsError").with_detail("first");
        let wrapped = original.clone().wrap_msg("bad id", &[&"id", &-3]);
        assert_eq!(original.detail(), "first");

        let root = find::<CodeError>(&wrapped).unwrap();
        assert_eq!(root.detail(), "first, bad id, id=-3");
        assert!(wrapped.to_string().contains("1001 ArgsError first, bad id, id=-3"));
    }

    #[test]
    fn test_wrap_msg_missing_value() {
        let wrapped = CodeError::new(1, "one").wrap_msg("", &[&"dangling"]);
        let root = find::<CodeError>(&wrapped).unwrap();
        assert_eq!(root.detail(), "dangling=MISSING");
    }

    #[test]
    fn test_wrap_renders_caller_frames() {
        let wrapped = CodeError::new(500, "ServerInternalError").wrap();
        let text = wrapped.to_string();
        assert!(text.contains("500 ServerInternalError"), "{text}");
        if !wrapped.stack().is_empty() {
            assert!(text.starts_with("Error: 500 ServerInternalError |"), "{text}");
        }
    }
}
