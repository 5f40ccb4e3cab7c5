//! Command-line interface definitions
//!
//! One positional argument: the target path. There are no functional
//! flags; `--help` and `--version` are the only other surfaces.

use clap::Parser;
use std::path::PathBuf;

/// Mark a file or directory for allocation on the XFS realtime device
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target path (created as an empty file if it does not exist)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}
