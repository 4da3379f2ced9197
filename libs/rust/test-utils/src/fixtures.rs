//! File system fixtures for rotation scenarios.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use tempfile::TempDir;

/// Poll `condition` every 10ms until it holds or `timeout` passes.
pub fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

/// Create `path` with `contents` and set its modification time.
///
/// # Errors
///
/// Returns an error if the file cannot be written or its time set.
pub fn touch_with_mtime(path: &Path, contents: &[u8], modified: SystemTime) -> io::Result<()> {
    fs::write(path, contents)?;
    File::options().write(true).open(path)?.set_modified(modified)
}

/// Temporary directory holding one log family.
#[derive(Debug)]
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `name` inside the directory.
    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// `pattern` inside the directory, as a string for `RotateConfig`.
    #[must_use]
    pub fn pattern(&self, pattern: &str) -> String {
        self.join(pattern).to_string_lossy().into_owned()
    }

    /// Sorted names of the directory entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn names(&self) -> io::Result<Vec<String>> {
        let mut names = fs::read_dir(self.path())?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }
}
