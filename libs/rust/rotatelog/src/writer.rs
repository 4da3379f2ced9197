//! The rotating writer.

use std::cell::Cell;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::{debug, warn};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::{Resolved, RotateConfig};
use crate::event::RotationEvent;
use crate::lock::RotationLock;
use crate::policy::{self, Current, Decision, Rules, Target};
use crate::{RotateError, retention, symlink};

thread_local! {
    // Set while this thread logs a report; a subscriber writing back into
    // the writer must not log another one.
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

#[derive(Debug, Default)]
struct State {
    file: Option<File>,
    name: Option<PathBuf>,
    base: String,
    generation: u32,
    closed: bool,
}

/// Why a rotation check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Write,
    Explicit,
}

/// A completed file switch.
#[derive(Debug)]
struct Switch {
    previous: Option<PathBuf>,
    current: PathBuf,
    generation: u32,
    expired: Vec<PathBuf>,
}

/// Outcome of a rotation check, acted on once the state lock is released.
///
/// Diagnostics go through `tracing`, whose subscriber may write into this
/// same writer, so nothing is logged while the lock is held.
#[derive(Debug, Default)]
#[must_use]
struct Report {
    switched: Option<Switch>,
    contended: Option<PathBuf>,
    failures: Vec<RotateError>,
}

/// A file writer that switches files by time bucket and size.
///
/// All writes and rotations are serialized behind one lock; the file is
/// opened lazily by the first write or [`rotate`](Self::rotate). Each switch
/// updates the optional symlink, sweeps expired files and notifies the
/// configured handler.
///
/// Writing is available through `io::Write` on `&RotatingWriter`, so one
/// writer can be shared between threads behind an `Arc`. It can also serve
/// as the sink of a global `tracing` subscriber that logs its own rotations.
///
/// ```no_run
/// use std::io::Write;
/// use platform_rotatelog::{RotateConfig, RotatingWriter};
///
/// let writer = RotatingWriter::new(
///     RotateConfig::new("/var/log/app/app.%Y%m%d").with_link_name("/var/log/app/current"),
/// )?;
/// (&writer).write_all(b"started\n")?;
/// writer.close()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RotatingWriter {
    config: Resolved,
    state: RwLock<State>,
}

impl RotatingWriter {
    /// Create a writer. No file is opened yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: RotateConfig) -> Result<Self, RotateError> {
        let config = config.validate()?;
        Ok(Self {
            config,
            state: RwLock::new(State::default()),
        })
    }

    /// Write `buf` to the current file, switching files first if the bucket
    /// changed or the size threshold was reached.
    ///
    /// # Errors
    ///
    /// Returns [`RotateError::Closed`] after [`close`](Self::close), or an
    /// I/O error from opening or writing the file.
    pub fn write(&self, buf: &[u8]) -> Result<usize, RotateError> {
        let (written, report) = {
            let mut guard = self.state.write();
            let state = &mut *guard;
            if state.closed {
                return Err(RotateError::Closed);
            }

            let report = self.advance(state, Trigger::Write)?;
            let written = match (state.file.as_mut(), state.name.as_deref()) {
                (Some(file), Some(name)) => {
                    file.write(buf).map_err(|err| RotateError::io("write", name, err))
                }
                _ => Err(RotateError::Closed),
            };
            (written, report)
        };

        self.finish(report);
        written
    }

    /// Switch to a new file now, regardless of bucket and size.
    ///
    /// Within the same bucket the next free generation (`name.1`,
    /// `name.2`, ...) is used.
    ///
    /// # Errors
    ///
    /// Unlike the write path, every failure is returned: lock contention,
    /// symlink or sweep failures included. The writer keeps its previous
    /// file in that case and a file created for the switch is removed.
    pub fn rotate(&self) -> Result<(), RotateError> {
        let report = {
            let mut guard = self.state.write();
            if guard.closed {
                return Err(RotateError::Closed);
            }
            self.advance(&mut guard, Trigger::Explicit)?
        };

        self.finish(report);
        Ok(())
    }

    /// File currently written to, `None` before the first open.
    #[must_use]
    pub fn current_file_name(&self) -> Option<PathBuf> {
        self.state.read().name.clone()
    }

    /// Close the current file. Later writes fail; closing again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if flushing the file fails.
    pub fn close(&self) -> Result<(), RotateError> {
        let mut guard = self.state.write();
        guard.closed = true;
        let Some(mut file) = guard.file.take() else {
            return Ok(());
        };
        let result = file.flush();
        drop(file);
        match (result, guard.name.as_deref()) {
            (Err(err), Some(name)) => Err(RotateError::io("flush", name, err)),
            _ => Ok(()),
        }
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    /// Decide and perform a switch. Runs under the state lock and must not
    /// log.
    fn advance(&self, state: &mut State, trigger: Trigger) -> Result<Report, RotateError> {
        let mut report = Report::default();
        let now = self.config.clock.now();
        let candidate = self
            .config
            .pattern
            .bucket_name(now, self.config.rotation_time)?;
        let size = state
            .name
            .as_deref()
            .and_then(|name| fs::metadata(name).ok())
            .map(|meta| meta.len());

        let current = Current {
            base: &state.base,
            generation: state.generation,
            open: state.file.is_some(),
        };
        let rules = Rules {
            rotation_size: self.config.rotation_size,
            force_new_file: self.config.force_new_file,
        };
        let target = match policy::decide(&current, &candidate, size, rules, trigger == Trigger::Explicit) {
            Decision::Keep => return Ok(report),
            Decision::Open(target) => target,
        };

        let (name, generation) = resolve_name(&target);
        let path = PathBuf::from(name);
        create_parent(&path)?;

        let lock = match RotationLock::acquire(&path) {
            Ok(lock) => Some(lock),
            Err(err @ RotateError::LockContention { .. }) => {
                if trigger == Trigger::Explicit {
                    return Err(err);
                }
                if state.file.is_some() {
                    report.contended = Some(path);
                    return Ok(report);
                }
                None
            }
            Err(err) => return Err(err),
        };

        let created = !path.exists();
        let file = open_append(&path)?;

        let mut expired = Vec::new();
        if let Some(lock) = lock {
            match self.publish(&path, now.into()) {
                Ok(paths) => expired = paths,
                Err(err) if trigger == Trigger::Explicit => {
                    drop(file);
                    if created {
                        let _ = fs::remove_file(&path);
                    }
                    return Err(err);
                }
                Err(err) => report.failures.push(err),
            }
            if let Err(err) = lock.release() {
                report.failures.push(err);
            }
        }

        state.file = Some(file);
        let previous = mem::replace(&mut state.name, Some(path.clone()));
        state.base = target.base;
        state.generation = generation;

        report.switched = Some(Switch {
            previous,
            current: path,
            generation,
            expired,
        });
        Ok(report)
    }

    /// Symlink swap for a freshly opened `path`; returns the files retention
    /// no longer keeps.
    fn publish(&self, path: &Path, now: SystemTime) -> Result<Vec<PathBuf>, RotateError> {
        if let Some(link_name) = &self.config.link_name {
            symlink::replace_symlink(path, link_name)?;
        }
        retention::select(self.config.pattern.glob(), self.config.retention, now)
    }

    /// Act on `report` with the state lock released.
    fn finish(&self, report: Report) {
        if let Some(switch) = &report.switched {
            retention::remove_detached(switch.expired.clone());
            if let Some(handler) = &self.config.handler {
                handler.dispatch(RotationEvent::new(
                    switch.previous.clone(),
                    switch.current.clone(),
                ));
            }
        }

        REPORTING.with(|reporting| {
            if reporting.replace(true) {
                return;
            }
            log_report(&report);
            reporting.set(false);
        });
    }
}

fn log_report(report: &Report) {
    if let Some(path) = &report.contended {
        debug!(file = %path.display(), "rotation in progress elsewhere, keeping current file");
    }
    for err in &report.failures {
        warn!(error = %err, "post-rotation step failed");
    }
    if let Some(switch) = &report.switched {
        debug!(
            previous = ?switch.previous,
            current = %switch.current.display(),
            generation = switch.generation,
            "switched log file"
        );
    }
}

fn resolve_name(target: &Target) -> (String, u32) {
    if target.probe {
        policy::next_free_name(&target.base, target.generation, |p| fs::metadata(p).is_ok())
    } else {
        (policy::generation_name(&target.base, target.generation), target.generation)
    }
}

fn create_parent(path: &Path) -> Result<(), RotateError> {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.exists() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(dir)
        .map_err(|err| RotateError::io("create directory", dir, err))
}

fn open_append(path: &Path) -> Result<File, RotateError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options
        .open(path)
        .map_err(|err| RotateError::io("open", path, err))
}

impl Write for &RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.state.write();
        match guard.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut &*self)
    }
}

impl<'a> MakeWriter<'a> for RotatingWriter {
    type Writer = &'a Self;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl Drop for RotatingWriter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to close rotating writer");
        }
    }
}
