//! Target classification and open
//!
//! Classification uses lstat semantics (`fs::symlink_metadata`), so a
//! symlink at the target is itself rejected rather than followed. Only
//! regular files and directories are supported; an absent target is
//! created as an empty mode-0600 regular file. The open descriptor is
//! carried in [`Target`] for the rest of the run and released by RAII on
//! every exit path.

use crate::error::{Result, RtError};
use log::{info, warn};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

/// Kind of object the target resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Regular file (pre-existing and empty, or freshly created)
    File,
    /// Directory
    Directory,
}

/// An open target: descriptor, owned path, and classification
#[derive(Debug)]
pub struct Target {
    file: File,
    path: PathBuf,
    kind: TargetKind,
}

impl Target {
    /// Path the target was opened at (for diagnostics)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classification of the target
    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

impl AsRawFd for Target {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

/// Classify the target path and open it for attribute operations
///
/// # Errors
///
/// Returns [`RtError::TargetStat`] if an existing target cannot be
/// inspected, [`RtError::NonEmptyFile`] for a regular file that already
/// holds data, [`RtError::UnsupportedType`] for anything that is neither
/// a regular file nor a directory, and [`RtError::Open`] if the open (or
/// creation) fails.
pub fn classify(path: &Path) -> Result<Target> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("target {} does not exist and will be created", path.display());
            return create(path);
        }
        Err(source) => {
            return Err(RtError::TargetStat {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let file_type = meta.file_type();
    if file_type.is_file() {
        if meta.len() > 0 {
            return Err(RtError::NonEmptyFile {
                path: path.to_path_buf(),
                size: meta.len(),
            });
        }
        info!("target {} is a regular file", path.display());
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| RtError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Target {
            file,
            path: path.to_path_buf(),
            kind: TargetKind::File,
        })
    } else if file_type.is_dir() {
        info!(
            "target {} is a directory; the inheritance flag will be applied",
            path.display()
        );
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_DIRECTORY)
            .open(path)
            .map_err(|source| RtError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Target {
            file,
            path: path.to_path_buf(),
            kind: TargetKind::Directory,
        })
    } else {
        Err(RtError::UnsupportedType { mode: meta.mode() })
    }
}

/// Create the target as an empty mode-0600 regular file
///
/// Truncate semantics match the original creation flags: a file that
/// appears between the lstat and the open is emptied, which is the benign
/// race the concurrency model scopes out.
fn create(path: &Path) -> Result<Target> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(|source| RtError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Target {
        file,
        path: path.to_path_buf(),
        kind: TargetKind::File,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use nix::sys::stat::Mode;
    use nix::unistd::mkfifo;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn absent_target_is_created_empty_and_owner_only() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("new.dat");
        let target = classify(&path).unwrap();
        assert_eq!(target.kind(), TargetKind::File);
        let meta = fs::metadata(&path).unwrap();
        assert_eq!(meta.len(), 0);
        assert_eq!(meta.mode() & 0o777, 0o600);
    }

    #[test]
    fn empty_file_classifies_as_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.dat");
        fs::write(&path, b"").unwrap();
        let target = classify(&path).unwrap();
        assert_eq!(target.kind(), TargetKind::File);
        assert_eq!(target.path(), path);
    }

    #[test]
    fn nonempty_file_is_rejected_with_its_size() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("full.dat");
        fs::write(&path, b"payload").unwrap();
        let err = classify(&path).unwrap_err();
        assert!(matches!(err, RtError::NonEmptyFile { size: 7, .. }));
    }

    #[test]
    fn directory_classifies_as_directory() {
        let tmp = TempDir::new().unwrap();
        let target = classify(tmp.path()).unwrap();
        assert_eq!(target.kind(), TargetKind::Directory);
    }

    #[test]
    fn symlink_is_unsupported_even_when_it_points_at_a_file() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("dest.dat");
        fs::write(&dest, b"").unwrap();
        let link = tmp.path().join("link");
        symlink(&dest, &link).unwrap();
        let err = classify(&link).unwrap_err();
        match err {
            RtError::UnsupportedType { mode } => {
                assert_eq!(mode & libc::S_IFMT, libc::S_IFLNK);
            }
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
    }

    #[test]
    fn fifo_is_unsupported_and_reports_its_mode() {
        let tmp = TempDir::new().unwrap();
        let fifo = tmp.path().join("pipe");
        mkfifo(&fifo, Mode::from_bits_truncate(0o600)).unwrap();
        let err = classify(&fifo).unwrap_err();
        match err {
            RtError::UnsupportedType { mode } => {
                assert_eq!(mode & libc::S_IFMT, libc::S_IFIFO);
            }
            other => panic!("expected UnsupportedType, got {other:?}"),
        }
    }
}
