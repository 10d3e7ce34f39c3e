//! File-system resource helpers.
use std::path::Path;

use crate::error::ChatmateError;

/// Ensure `dir` exists as a directory, creating it (and any ancestors) if
/// necessary.
///
/// # Errors
///
/// Returns [`ChatmateError::Io`] if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<(), ChatmateError> {
    std::fs::create_dir_all(dir).map_err(|e| ChatmateError::io(dir, e))
}

/// Remove the file or symlink at `path`, including broken symlinks.
///
/// Returns `true` when something was removed and `false` when nothing was
/// there.  A directory at `path` is never removed.
///
/// # Errors
///
/// Returns [`ChatmateError::Io`] if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<bool, ChatmateError> {
    if path.symlink_metadata().is_err() {
        return Ok(false);
    }
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ChatmateError::io(path, e)),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dir_fails_when_a_file_is_in_the_way() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(ensure_dir(&file), Err(ChatmateError::Io { .. })));
    }

    #[test]
    fn remove_existing_removes_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("target");
        std::fs::write(&file, "content").unwrap();
        assert!(remove_existing(&file).unwrap());
        assert!(!file.exists());
    }

    #[test]
    fn remove_existing_noop_when_path_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!remove_existing(&dir.path().join("nonexistent")).unwrap());
    }

    #[test]
    fn remove_existing_refuses_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        assert!(remove_existing(&sub).is_err());
        assert!(sub.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn remove_existing_removes_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("/nonexistent/target", &link).unwrap();
        assert!(remove_existing(&link).unwrap());
        assert!(link.symlink_metadata().is_err());
    }
}
