//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive runs only log when a file is
//! given. Headless runs log to stderr. `RUST_LOG` overrides the level derived
//! from `-v`.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Discard everything.
    Off,
    /// Standard error.
    Stderr,
    /// Append to a file.
    File(&'a Path),
}

/// Maps a `-v` count to a level.
#[must_use]
pub const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// Installing twice is not an error; the first subscriber stays.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(target: LogTarget<'_>, verbosity: u8) -> io::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(verbosity));
    let installed = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
