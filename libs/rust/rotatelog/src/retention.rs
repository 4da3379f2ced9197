//! Retention sweep over files produced by a pattern.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};

use crate::RotateError;
use crate::lock::LOCK_SUFFIX;
use crate::symlink::SYMLINK_SUFFIX;

/// How old files are selected for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Remove files last modified at or before `now - age`.
    MaxAge(Duration),
    /// Keep the last `count` files in glob order; symlinks are never counted.
    MaxCount(usize),
}

/// Files matching `glob_pattern` that `retention` no longer keeps.
///
/// Lock and temporary symlink markers are ignored, as are files that
/// cannot be inspected. In count mode the oldest names in lexicographic
/// glob order are returned.
///
/// # Errors
///
/// Returns [`RotateError::InvalidPattern`] if `glob_pattern` is not a valid
/// glob.
pub fn select(
    glob_pattern: &str,
    retention: Retention,
    now: SystemTime,
) -> Result<Vec<PathBuf>, RotateError> {
    let matches = glob::glob(glob_pattern).map_err(|_| RotateError::InvalidPattern {
        pattern: glob_pattern.to_string(),
    })?;

    let cutoff = match retention {
        Retention::MaxAge(age) => now.checked_sub(age),
        Retention::MaxCount(_) => None,
    };

    let mut candidates = Vec::new();
    for path in matches.flatten() {
        let name = path.to_string_lossy();
        if name.ends_with(LOCK_SUFFIX) || name.ends_with(SYMLINK_SUFFIX) {
            continue;
        }

        let Ok(meta) = fs::metadata(&path) else {
            continue;
        };
        let Ok(link_meta) = fs::symlink_metadata(&path) else {
            continue;
        };

        match retention {
            Retention::MaxAge(_) => {
                let Some(cutoff) = cutoff else {
                    continue;
                };
                let Ok(modified) = meta.modified() else {
                    continue;
                };
                if modified > cutoff {
                    continue;
                }
            }
            Retention::MaxCount(_) => {
                if link_meta.file_type().is_symlink() {
                    continue;
                }
            }
        }
        candidates.push(path);
    }

    if let Retention::MaxCount(count) = retention {
        if candidates.len() <= count {
            return Ok(Vec::new());
        }
        candidates.truncate(candidates.len() - count);
    }
    Ok(candidates)
}

/// Delete `paths` on a detached thread. Failures are logged per file.
pub fn remove_detached(paths: Vec<PathBuf>) {
    if paths.is_empty() {
        return;
    }
    let spawned = thread::Builder::new()
        .name("rotatelog-retention".to_string())
        .spawn(move || remove_all(&paths));
    if let Err(err) = spawned {
        warn!(error = %err, "failed to spawn retention thread");
    }
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!(file = %path.display(), "removed expired log file"),
            Err(err) => warn!(error = %err, file = %path.display(), "failed to remove expired log file"),
        }
    }
}
