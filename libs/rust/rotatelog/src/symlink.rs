//! Atomic "current file" symlink.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::RotateError;

/// Suffix of the temporary link created before the swap.
pub const SYMLINK_SUFFIX: &str = "_symlink";

/// Point `link_name` at `target`.
///
/// The new link is created next to `target` as `<target>_symlink` and renamed
/// over `link_name`, so readers never observe a missing link. The link's
/// parent directory is created if needed. On failure the temporary link is
/// removed again.
///
/// # Errors
///
/// Returns [`RotateError::Io`] naming the step that failed.
pub fn replace_symlink(target: &Path, link_name: &Path) -> Result<(), RotateError> {
    let mut tmp = target.as_os_str().to_os_string();
    tmp.push(SYMLINK_SUFFIX);
    let tmp = PathBuf::from(tmp);

    let dest = link_target(target, link_name);

    let link_dir = parent_or_current(link_name);
    if !link_dir.exists() {
        fs::create_dir_all(link_dir)
            .map_err(|err| RotateError::io("create directory", link_dir, err))?;
    }

    match fs::remove_file(&tmp) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(RotateError::io("remove stale symlink", &tmp, err)),
    }
    create_symlink(&dest, &tmp).map_err(|err| RotateError::io("create symlink", &tmp, err))?;

    fs::rename(&tmp, link_name).map_err(|err| {
        let _ = fs::remove_file(&tmp);
        RotateError::io("rename symlink", link_name, err)
    })
}

/// Path stored in the link.
///
/// When `link_name` lies under `target`'s directory the link is made
/// relative to its own directory, keeping the tree relocatable. Otherwise,
/// or if no relative form exists, `target` is stored as given.
#[must_use]
pub fn link_target(target: &Path, link_name: &Path) -> PathBuf {
    let base_dir = parent_or_current(target);
    let under_base = link_name
        .to_string_lossy()
        .contains(&*base_dir.to_string_lossy());
    if !under_base {
        return target.to_path_buf();
    }
    pathdiff::diff_paths(target, parent_or_current(link_name))
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| target.to_path_buf())
}

fn parent_or_current(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(original, link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_in_same_directory_is_relative() {
        assert_eq!(
            link_target(Path::new("/var/log/app.log.1"), Path::new("/var/log/current")),
            PathBuf::from("app.log.1")
        );
    }

    #[test]
    fn test_link_in_subdirectory_climbs_up() {
        assert_eq!(
            link_target(Path::new("/var/log/app.log"), Path::new("/var/log/links/current")),
            PathBuf::from("../app.log")
        );
    }

    #[test]
    fn test_link_elsewhere_is_absolute() {
        assert_eq!(
            link_target(Path::new("/var/log/app.log"), Path::new("/tmp/current")),
            PathBuf::from("/var/log/app.log")
        );
    }

    #[test]
    fn test_bare_file_names_are_relative() {
        assert_eq!(
            link_target(Path::new("app.log"), Path::new("./current")),
            PathBuf::from("app.log")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_replace_symlink_swaps_target() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("app.log");
        let second = dir.path().join("app.log.1");
        fs::write(&first, b"one").unwrap();
        fs::write(&second, b"two").unwrap();
        let link = dir.path().join("current");

        replace_symlink(&first, &link).unwrap();
        assert_eq!(fs::read(&link).unwrap(), b"one");

        replace_symlink(&second, &link).unwrap();
        assert_eq!(fs::read(&link).unwrap(), b"two");
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("app.log.1"));
        assert!(!dir.path().join("app.log.1_symlink").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_rename_removes_temporary_link() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("app.log");
        fs::write(&target, b"x").unwrap();
        let occupied = dir.path().join("current");
        fs::create_dir(&occupied).unwrap();
        fs::write(occupied.join("keep"), b"").unwrap();

        let err = replace_symlink(&target, &occupied).unwrap_err();
        assert!(matches!(err, RotateError::Io { op: "rename symlink", .. }));
        assert!(fs::symlink_metadata(dir.path().join("app.log_symlink")).is_err());
        assert!(occupied.join("keep").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_replace_symlink_creates_link_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("app.log");
        fs::write(&target, b"x").unwrap();
        let link = dir.path().join("links").join("nested").join("current");

        replace_symlink(&target, &link).unwrap();
        assert_eq!(fs::read(&link).unwrap(), b"x");
    }
}
