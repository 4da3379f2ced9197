//! Cross-process rotation lock.
//!
//! The lock is a marker file `<target>_lock` created exclusively; whoever
//! creates it owns the rotation of `<target>` until it is released or the
//! guard drops. A marker left by a crashed process is never reclaimed.

use std::fs::{self, OpenOptions};
use std::io;
use std::mem;
use std::path::{Path, PathBuf};

use crate::RotateError;

/// Suffix of lock marker files.
pub const LOCK_SUFFIX: &str = "_lock";

/// Marker path guarding rotation into `target`.
#[must_use]
pub fn lock_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

/// Held rotation lock, released on drop.
#[derive(Debug)]
pub struct RotationLock {
    path: PathBuf,
}

impl RotationLock {
    /// Acquire the lock for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RotateError::LockContention`] if the marker already exists
    /// and [`RotateError::Io`] for any other failure.
    pub fn acquire(target: &Path) -> Result<Self, RotateError> {
        let path = lock_path(target);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                Err(RotateError::LockContention { path })
            }
            Err(err) => Err(RotateError::io("create lock", &path, err)),
        }
    }

    /// Marker path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the marker, reporting a failure instead of ignoring it.
    ///
    /// # Errors
    ///
    /// Returns [`RotateError::Io`] if the marker cannot be removed.
    pub fn release(mut self) -> Result<(), RotateError> {
        let path = mem::take(&mut self.path);
        fs::remove_file(&path).map_err(|err| RotateError::io("remove lock", &path, err))
    }
}

impl Drop for RotationLock {
    // May run under the writer's state lock: no logging here.
    fn drop(&mut self) {
        if !self.path.as_os_str().is_empty() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
