//! # xfsrt
//!
//! Mark a file or directory for allocation on the XFS realtime device.
//!
//! The pipeline has four stages, each a module:
//! - [`fstype`]: validate that the target's parent directory is on XFS
//!   (statfs magic-number probe)
//! - [`target`]: classify the target (regular file, directory, or
//!   created-on-absence) and open it
//! - [`fsxattr`]: read-modify-write of the fsxattr record, setting
//!   FS_XFLAG_REALTIME on files or FS_XFLAG_RTINHERIT on directories,
//!   idempotently
//! - [`logger`]: leveled stderr diagnostics, colored only when stderr is
//!   a terminal device
//!
//! Every stage returns `Result`; only the binary terminates the process.

pub mod cli;
pub mod error;
pub mod fstype;
pub mod fsxattr;
pub mod logger;
pub mod target;

// Re-export main types
pub use error::{Result, RtError};
pub use fsxattr::{ensure_flag, FlagOutcome, FsxAttr, RtFlag, XflagStore};
pub use target::{Target, TargetKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the whole pipeline for one target path
///
/// Validates the filesystem, classifies and opens the target, and
/// ensures the flag its kind calls for is set. The target's descriptor
/// is released by RAII before this function returns, on success and
/// failure alike.
///
/// # Errors
///
/// Returns the first stage failure as an [`RtError`]; see
/// [`fstype::ensure_xfs`], [`target::classify`], and
/// [`fsxattr::ensure_flag`].
pub fn run(args: &cli::Args) -> Result<FlagOutcome> {
    fstype::ensure_xfs(&args.path)?;
    let mut target = target::classify(&args.path)?;
    let flag = RtFlag::for_kind(target.kind());
    let path = target.path().to_path_buf();
    fsxattr::ensure_flag(&mut target, &path, flag)
}
