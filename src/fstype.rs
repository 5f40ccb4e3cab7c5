//! Filesystem-type validation
//!
//! The realtime flag only means something on XFS, so before touching the
//! target at all the parent directory is probed with statfs(2) and its
//! `f_type` magic compared against `XFS_SUPER_MAGIC`. The parent is derived
//! lexically; the target itself may not exist yet.

use crate::error::{Result, RtError};
use nix::sys::statfs::{statfs, XFS_SUPER_MAGIC};
use std::fs;
use std::path::Path;

/// Lexical parent directory of a target path
///
/// A bare filename resolves to the current directory; a root (or
/// prefix-only) path is its own parent. Symlinks are left to the
/// directory lookup of the subsequent stat.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => path,
    }
}

/// Probe whether a directory resides on XFS
///
/// A non-XFS answer is a normal outcome, not an error; only the probe
/// itself failing is an error.
///
/// # Errors
///
/// Returns [`RtError::Statfs`] if statfs(2) fails on `dir`.
pub fn is_xfs(dir: &Path) -> Result<bool> {
    let stats = statfs(dir).map_err(|source| RtError::Statfs {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(stats.filesystem_type() == XFS_SUPER_MAGIC)
}

/// Require that the parent directory of `target` is on XFS
///
/// # Errors
///
/// Returns [`RtError::ParentStat`] if the parent cannot be inspected,
/// [`RtError::ParentNotDir`] if it is not a directory, [`RtError::Statfs`]
/// if the filesystem probe fails, and [`RtError::NotXfs`] if the probe
/// reports any filesystem other than XFS.
pub fn ensure_xfs(target: &Path) -> Result<()> {
    let parent = parent_dir(target);

    let meta = fs::metadata(parent).map_err(|source| RtError::ParentStat {
        path: parent.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(RtError::ParentNotDir {
            path: parent.to_path_buf(),
        });
    }

    if !is_xfs(parent)? {
        return Err(RtError::NotXfs {
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bare_filename_resolves_to_current_directory() {
        assert_eq!(parent_dir(Path::new("file.dat")), Path::new("."));
    }

    #[test]
    fn nested_path_resolves_to_its_directory() {
        assert_eq!(parent_dir(Path::new("a/b/file.dat")), Path::new("a/b"));
        assert_eq!(parent_dir(Path::new("/var/file.dat")), Path::new("/var"));
    }

    #[test]
    fn root_is_its_own_parent() {
        assert_eq!(parent_dir(Path::new("/")), Path::new("/"));
    }

    #[test]
    fn missing_parent_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("no/such/dir/file.dat");
        let err = ensure_xfs(&target).unwrap_err();
        assert!(matches!(err, RtError::ParentStat { .. }));
    }

    #[test]
    fn file_parent_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let err = ensure_xfs(&blocker.join("file.dat")).unwrap_err();
        assert!(matches!(err, RtError::ParentNotDir { .. }));
    }

    #[test]
    fn probe_answers_for_a_real_directory() {
        // The host tempdir may or may not be XFS; the probe itself must succeed.
        let tmp = TempDir::new().unwrap();
        is_xfs(tmp.path()).unwrap();
    }
}
