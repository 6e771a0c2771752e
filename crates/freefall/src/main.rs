#![forbid(unsafe_code)]

//! `freefall` binary.
//!
//! ```bash
//! cargo run -p freefall -- --gravity 1.62
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;

use freefall::cli::{Cli, Command, LabelsArgs, SimulateArgs};
use freefall::config::Config;
use freefall::headless::{self, HeadlessError};
use freefall::logging::{self, LogTarget};
use freefall::{App, Labels, Program};

/// Exit status for a rejected acceleration.
const EXIT_INVALID_GRAVITY: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();
    let config = Config::from_cli(&cli).context("failed to load configuration")?;
    config.validate()?;

    match &cli.command {
        Some(Command::Simulate(args)) => simulate(&config, args),
        Some(Command::Labels(args)) => labels(&config, args),
        None => interactive(&config),
    }
}

fn simulate(config: &Config, args: &SimulateArgs) -> anyhow::Result<ExitCode> {
    logging::init(LogTarget::Stderr, config.verbosity)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match headless::simulate(config, args, &mut out) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(HeadlessError::Sim(err)) => {
            tracing::error!(error = %err, "simulation rejected");
            eprintln!("error: {err}");
            Ok(ExitCode::from(EXIT_INVALID_GRAVITY))
        }
        Err(err) => Err(err).context("headless simulation failed"),
    }
}

fn labels(config: &Config, args: &LabelsArgs) -> anyhow::Result<ExitCode> {
    logging::init(LogTarget::Stderr, config.verbosity)?;

    let labels = Labels::new(args.lang.unwrap_or(config.language));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (key, text) in labels.iter() {
        writeln!(out, "{}\t{text}", key.id())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn interactive(config: &Config) -> anyhow::Result<ExitCode> {
    let target = config
        .log_file
        .as_deref()
        .map_or(LogTarget::Off, LogTarget::File);
    logging::init(target, config.verbosity)
        .with_context(|| format!("failed to open log file {:?}", config.log_file))?;
    tracing::info!(
        gravity = config.gravity,
        language = %config.language,
        fps = config.fps,
        "starting freefall"
    );

    let app = App::new(config.app_config());
    Program::new(app)
        .with_alt_screen(config.alt_screen)
        .with_fps(config.fps)
        .run()
        .context("terminal program failed")?;

    Ok(ExitCode::SUCCESS)
}
