//! Rotation notifications.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use tracing::warn;

/// Kind of event delivered to a [`Handler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The writer switched to a different file.
    FileRotated,
}

/// Emitted once per file switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationEvent {
    previous: Option<PathBuf>,
    current: PathBuf,
}

impl RotationEvent {
    /// Create an event for a switch from `previous` to `current`.
    #[must_use]
    pub const fn new(previous: Option<PathBuf>, current: PathBuf) -> Self {
        Self { previous, current }
    }

    /// Always [`EventType::FileRotated`].
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        EventType::FileRotated
    }

    /// File written before the switch, `None` for the first file opened.
    #[must_use]
    pub fn previous(&self) -> Option<&Path> {
        self.previous.as_deref()
    }

    /// File written after the switch.
    #[must_use]
    pub fn current(&self) -> &Path {
        &self.current
    }
}

/// Receives rotation events.
///
/// Events are delivered on a detached thread, so implementations must not
/// assume they run before the next write returns.
pub trait Handler: Send + Sync + 'static {
    /// Handle one event.
    fn handle(&self, event: &RotationEvent);
}

impl<F> Handler for F
where
    F: Fn(&RotationEvent) + Send + Sync + 'static,
{
    fn handle(&self, event: &RotationEvent) {
        self(event);
    }
}

/// Shared handler reference held by the writer configuration.
#[derive(Clone)]
pub struct SharedHandler(Arc<dyn Handler>);

impl SharedHandler {
    /// Wrap `handler`.
    pub fn new(handler: impl Handler) -> Self {
        Self(Arc::new(handler))
    }

    /// Deliver `event` without blocking the caller.
    pub(crate) fn dispatch(&self, event: RotationEvent) {
        let handler = Arc::clone(&self.0);
        let spawned = thread::Builder::new()
            .name("rotatelog-event".to_string())
            .spawn(move || handler.handle(&event));
        if let Err(err) = spawned {
            warn!(error = %err, "failed to spawn rotation event thread");
        }
    }
}

impl fmt::Debug for SharedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedHandler(..)")
    }
}
