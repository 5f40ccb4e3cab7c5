//! xfsrt binary entry point
//!
//! Exit codes: 0 on success (including the already-set no-op), 1 on any
//! failure, with exactly one error-level line logged before exit.
//! `--help` and `--version` exit 0.

use clap::error::ErrorKind;
use clap::Parser;
use log::error;
use std::process;
use xfsrt::cli::Args;

fn main() {
    if xfsrt::logger::init().is_err() {
        eprintln!("ERROR: failed to install logger");
        process::exit(1);
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err)
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            err.exit()
        }
        Err(err) => {
            // clap exits 2 on usage errors; the contract is 1, one line.
            let message = match err.kind() {
                ErrorKind::MissingRequiredArgument => String::from("no file path given"),
                _ => err
                    .to_string()
                    .lines()
                    .next()
                    .unwrap_or("invalid usage")
                    .to_string(),
            };
            error!("{message}");
            process::exit(1);
        }
    };

    if let Err(err) = xfsrt::run(&args) {
        error!("{err}");
        process::exit(1);
    }
}
