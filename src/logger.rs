//! Leveled diagnostics on stderr
//!
//! Every message is one line, wrapped in a level template (`INFO: …`,
//! `WARN: …`, `ERROR: …`). The colored variants are used only when stderr
//! is attached to a terminal, detected by checking whether the descriptor
//! is a character-special device. The check runs on every call rather than
//! being cached, so a stream reattached mid-run is handled consistently.
//!
//! The sink installs behind the `log` facade, so callers use the ordinary
//! `info!`/`warn!`/`error!` macros and the usual format-string contract.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;

/// ANSI color codes for terminal output
struct Colors;

impl Colors {
    const RED: &'static str = "\x1b[0;31m";
    const GREEN: &'static str = "\x1b[0;32m";
    const RESET: &'static str = "\x1b[0m";
}

/// Check whether stderr is a terminal device
///
/// True only when fstat(2) reports a character-special device; pipes and
/// regular files (redirected output) stay uncolored. A failed fstat is
/// treated as "not a terminal".
fn stderr_is_terminal() -> bool {
    let fd = io::stderr().as_raw_fd();
    match nix::sys::stat::fstat(fd) {
        Ok(st) => (st.st_mode & libc::S_IFMT) == libc::S_IFCHR,
        Err(_) => false,
    }
}

/// Wrap a message in its level template
fn render(level: Level, message: &str, colored: bool) -> String {
    let (tag, color) = match level {
        Level::Error => ("ERROR", Colors::RED),
        // warn shares error's red
        Level::Warn => ("WARN", Colors::RED),
        _ => ("INFO", Colors::GREEN),
    };
    if colored {
        format!("{}{}: {}{}", color, tag, message, Colors::RESET)
    } else {
        format!("{tag}: {message}")
    }
}

/// `log` sink writing level-templated lines to stderr
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = render(
            record.level(),
            &record.args().to_string(),
            stderr_is_terminal(),
        );
        // Best effort: a failed stderr write has nowhere left to report to.
        let _ = writeln!(io::stderr(), "{line}");
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr sink as the global logger
///
/// # Errors
///
/// Returns an error if a global logger is already installed.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_templates_carry_no_escapes() {
        assert_eq!(render(Level::Info, "hello", false), "INFO: hello");
        assert_eq!(render(Level::Warn, "careful", false), "WARN: careful");
        assert_eq!(render(Level::Error, "boom", false), "ERROR: boom");
    }

    #[test]
    fn colored_templates_wrap_with_level_color() {
        assert_eq!(
            render(Level::Info, "hello", true),
            "\x1b[0;32mINFO: hello\x1b[0m"
        );
        assert_eq!(
            render(Level::Error, "boom", true),
            "\x1b[0;31mERROR: boom\x1b[0m"
        );
    }

    #[test]
    fn warn_is_painted_like_error() {
        assert_eq!(
            render(Level::Warn, "careful", true),
            "\x1b[0;31mWARN: careful\x1b[0m"
        );
    }
}
