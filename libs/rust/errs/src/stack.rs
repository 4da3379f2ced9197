//! Stack capture at wrap time.
//!
//! A [`Stack`] records raw instruction pointers when an error is wrapped and
//! only resolves them to symbols when the error is rendered.

use std::error::Error as StdError;
use std::ffi::c_void;
use std::fmt;

use crate::BoxError;

/// Maximum number of frames recorded per capture.
pub const MAX_DEPTH: usize = 32;

/// Frames past which rendering stops: runtime startup, panic machinery and
/// the test harness.
const RUNTIME_PREFIXES: &[&str] = &[
    "std::rt::",
    "std::panicking::",
    "std::panic::",
    "std::sys::",
    "std::sys_common::",
    "core::ops::function::",
    "test::",
    "__rust_",
];

/// A resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Demangled function path, without the symbol hash
    pub function: String,
    /// Source file
    pub file: String,
    /// Source line
    pub line: u32,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}() {}:{}", self.function, self.file, self.line)
    }
}

/// Instruction pointers recorded at capture time.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Stack {
    pcs: Vec<usize>,
}

impl Stack {
    /// Record up to [`MAX_DEPTH`] frames of the current call stack.
    ///
    /// The trace starts at the caller of `capture`; `skip` drops that many
    /// further frames so wrapping helpers can keep themselves out of it. If
    /// the capture point cannot be located on the unwound stack every frame
    /// is kept.
    #[inline(never)]
    #[must_use]
    pub fn capture(skip: usize) -> Self {
        let anchor = Self::capture as *const () as usize;
        let limit = MAX_DEPTH + skip + 16;
        let mut all = Vec::with_capacity(limit);
        let mut start = None;

        backtrace::trace(|frame| {
            if start.is_none() && frame.symbol_address() as usize == anchor {
                start = Some(all.len() + 1);
            }
            all.push(frame.ip() as usize);
            all.len() < limit
        });

        let begin = start.map_or(0, |s| s + skip);
        let pcs = all.into_iter().skip(begin).take(MAX_DEPTH).collect();
        Self { pcs }
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pcs.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }

    /// Resolve the recorded frames.
    ///
    /// Frames without symbol, file or line information are skipped.
    /// Resolution stops at the first runtime frame.
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.pcs.len());
        for &pc in &self.pcs {
            let Some(frame) = resolve(pc) else {
                continue;
            };
            if RUNTIME_PREFIXES.iter().any(|p| frame.function.starts_with(p)) {
                break;
            }
            frames.push(frame);
        }
        frames
    }

    /// Render `base` with the resolved trace:
    /// `Error: <base> | -> fn() file:line -> ...`.
    ///
    /// Without recorded frames `base` is rendered alone.
    #[must_use]
    pub fn render(&self, base: &dyn fmt::Display) -> String {
        if self.pcs.is_empty() {
            return base.to_string();
        }

        let mut out = format!("Error: {base} |");
        for frame in self.frames() {
            out.push_str(" -> ");
            out.push_str(&frame.to_string());
        }
        out
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack").field("depth", &self.pcs.len()).finish()
    }
}

fn resolve(pc: usize) -> Option<Frame> {
    let mut resolved = None;
    backtrace::resolve(pc as *mut c_void, |symbol| {
        if resolved.is_some() {
            return;
        }
        if let (Some(name), Some(file), Some(line)) =
            (symbol.name(), symbol.filename(), symbol.lineno())
        {
            resolved = Some(Frame {
                function: format!("{name:#}"),
                file: file.display().to_string(),
                line,
            });
        }
    });
    resolved
}

/// An error paired with the stack captured when it was wrapped.
///
/// `Display` renders the trace, `source()` yields the wrapped error.
pub struct StackError {
    inner: BoxError,
    stack: Stack,
}

impl StackError {
    /// Wrap `err`, capturing the caller's stack.
    #[inline(never)]
    pub fn new<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::capture_with(err, 1)
    }

    /// Wrap `err`, hiding this function and `skip` callers above it.
    #[inline(never)]
    pub fn capture_with<E>(err: E, skip: usize) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: err.into(),
            stack: Stack::capture(skip + 1),
        }
    }

    /// The wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// The captured stack.
    #[must_use]
    pub const fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Discard the stack and return the wrapped error.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stack.render(&self.inner))
    }
}

impl fmt::Debug for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackError")
            .field("inner", &self.inner)
            .field("stack", &self.stack)
            .finish()
    }
}

impl StdError for StackError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.inner.as_ref())
    }
}
