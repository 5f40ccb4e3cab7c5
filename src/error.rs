//! Error types for realtime-flag operations
//!
//! Every stage of the pipeline returns `Result<T>`; nothing below the binary
//! terminates the process. The binary maps an `RtError` to a single
//! error-level log line and exit code 1.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`RtError`]
pub type Result<T> = std::result::Result<T, RtError>;

/// Errors raised while validating, classifying, or flagging a target
///
/// The variants fall into three groups: environment validation (parent
/// directory and filesystem type), target state (object kind and size), and
/// system-call failures (stat, open, and the fsxattr ioctl pair). Usage
/// errors never reach this type; the CLI layer handles them before the
/// pipeline runs.
#[derive(Debug, Error)]
pub enum RtError {
    /// Parent directory of the target could not be inspected
    #[error("failed to stat parent directory {}: {}", path.display(), source)]
    ParentStat {
        /// Parent directory path
        path: PathBuf,
        /// Underlying stat error
        source: io::Error,
    },

    /// Parent of the target exists but is not a directory
    #[error("parent {} is not a directory", path.display())]
    ParentNotDir {
        /// Offending parent path
        path: PathBuf,
    },

    /// Filesystem-statistics probe of the parent directory failed
    #[error("failed to statfs {}: {}", path.display(), source)]
    Statfs {
        /// Probed directory path
        path: PathBuf,
        /// Errno from statfs(2)
        source: nix::Error,
    },

    /// Parent directory is on a filesystem other than XFS
    #[error("target {} is not on an XFS filesystem", path.display())]
    NotXfs {
        /// Target path whose parent failed the probe
        path: PathBuf,
    },

    /// Target exists but could not be inspected
    #[error("failed to stat target {}: {}", path.display(), source)]
    TargetStat {
        /// Target path
        path: PathBuf,
        /// Underlying lstat error
        source: io::Error,
    },

    /// Target is neither a regular file nor a directory
    #[error("target file type not supported: mode {mode:#o}")]
    UnsupportedType {
        /// Raw st_mode bits, for diagnosis
        mode: u32,
    },

    /// Target is a regular file that already holds data
    #[error("file size must be zero before the realtime flag can be set: {} has {} bytes", path.display(), size)]
    NonEmptyFile {
        /// Target path
        path: PathBuf,
        /// Observed size in bytes
        size: u64,
    },

    /// Target could not be opened (or created when absent)
    #[error("failed to open target {}: {}", path.display(), source)]
    Open {
        /// Target path
        path: PathBuf,
        /// Underlying open error
        source: io::Error,
    },

    /// FS_IOC_FSGETXATTR failed on the open target
    #[error("failed to read extended attributes of {}: {}", path.display(), source)]
    ReadAttrs {
        /// Target path
        path: PathBuf,
        /// Errno from the ioctl
        source: nix::Error,
    },

    /// FS_IOC_FSSETXATTR failed on the open target
    #[error("failed to write extended attributes of {}: {}", path.display(), source)]
    WriteAttrs {
        /// Target path
        path: PathBuf,
        /// Errno from the ioctl
        source: nix::Error,
    },
}
