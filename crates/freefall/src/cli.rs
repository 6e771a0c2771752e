//! Command-line interface for `freefall`.
//!
//! # Examples
//!
//! ```bash
//! # Interactive, starting from lunar gravity in Kazakh
//! freefall --gravity 1.62 --lang kk
//!
//! # Headless run on a 1000x600 px canvas
//! freefall simulate --width 1000 --height 600
//!
//! # Print the label table for Russian
//! freefall labels --lang ru
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::i18n::Language;

/// Free fall in the terminal.
///
/// Drops a ball under a chosen acceleration and leaves a labelled shadow at
/// every whole second of flight.
#[derive(Parser, Debug, Clone)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "CLI flags are naturally bools"
)]
#[command(name = "freefall", author, version, about)]
pub struct Cli {
    /// Initial acceleration in m/s²
    #[arg(long, short = 'g', allow_negative_numbers = true, env = "FREEFALL_GRAVITY")]
    pub gravity: Option<f64>,

    /// Display language
    #[arg(long, short = 'l', value_enum, env = "FREEFALL_LANG")]
    pub lang: Option<Language>,

    /// Target frames per second (1-120)
    #[arg(long)]
    pub fps: Option<u32>,

    /// Path to a TOML config file
    #[arg(long, env = "FREEFALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable alternate screen mode
    #[arg(long)]
    pub no_alt_screen: bool,

    /// Force color output off
    ///
    /// Respects `NO_COLOR` environment variable
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Force color output on (overrides `NO_COLOR`)
    #[arg(long, conflicts_with = "no_color")]
    pub force_color: bool,

    /// Leave one shadow for every second a slow frame skipped
    #[arg(long)]
    pub catch_up_shadows: bool,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Optional subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a drop without a terminal UI and print a report
    Simulate(SimulateArgs),

    /// Print the label table for a language
    Labels(LabelsArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Host area width in pixels
    #[arg(long, default_value_t = 1000.0)]
    pub width: f64,

    /// Host area height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 60.0)]
    pub max_seconds: f64,

    /// Skip the final rendered frame
    #[arg(long)]
    pub no_frame: bool,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            max_seconds: 60.0,
            no_frame: false,
        }
    }
}

/// Arguments for the `labels` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct LabelsArgs {
    /// Language to print (defaults to the configured one)
    #[arg(long, short = 'l', value_enum)]
    pub lang: Option<Language>,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_runs_interactive() {
        let cli = Cli::try_parse_from(["freefall"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn negative_gravity_parses() {
        let cli = Cli::try_parse_from(["freefall", "-g", "-5"]).unwrap();
        assert_eq!(cli.gravity, Some(-5.0));
    }

    #[test]
    fn language_value_enum() {
        let cli = Cli::try_parse_from(["freefall", "--lang", "kk"]).unwrap();
        assert_eq!(cli.lang, Some(Language::Kk));
        assert!(Cli::try_parse_from(["freefall", "--lang", "de"]).is_err());
    }

    #[test]
    fn simulate_defaults() {
        let cli = Cli::try_parse_from(["freefall", "simulate"]).unwrap();
        match cli.command {
            Some(Command::Simulate(args)) => {
                assert!((args.width - 1000.0).abs() < f64::EPSILON);
                assert!((args.height - 600.0).abs() < f64::EPSILON);
                assert!((args.max_seconds - 60.0).abs() < f64::EPSILON);
                assert!(!args.no_frame);
            }
            other => panic!("expected simulate, got {other:?}"),
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["freefall", "simulate", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn color_flags_conflict() {
        assert!(Cli::try_parse_from(["freefall", "--no-color", "--force-color"]).is_err());
    }

    #[test]
    fn labels_takes_language() {
        let cli = Cli::try_parse_from(["freefall", "labels", "--lang", "ru"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Labels(LabelsArgs {
                lang: Some(Language::Ru)
            }))
        ));
    }
}
