//! Terminal-free runs for the `simulate` subcommand.
//!
//! A drop is driven on a [`ManualClock`] at the configured frame rate, so
//! the same arguments always produce the same report.

use std::io::{self, Write};

use kinematics::{FreeFall, Scale};

use crate::ball::Shadow;
use crate::cli::SimulateArgs;
use crate::config::Config;
use crate::error::SimError;
use crate::i18n::Labels;
use crate::render::{self, PANEL_ROWS, Scene};
use crate::scheduler::{Clock, FrameDriver, ManualClock};
use crate::sim::{Phase, Simulation};
use crate::viewport::Canvas;

/// Errors from a headless run.
#[derive(thiserror::Error, Debug)]
pub enum HeadlessError {
    /// The configured gravity was rejected.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Frames delivered.
    pub frames: usize,
    /// Final phase; `Running` if the frame limit was hit first.
    pub phase: Phase,
    /// Simulated seconds at the last frame.
    pub elapsed: f64,
    /// Meters fallen at the last frame.
    pub meters: f64,
    /// Closed-form time to reach the ground, in seconds.
    pub expected_landing: f64,
    /// Every shadow, origin first.
    pub shadows: Vec<Shadow>,
}

impl Report {
    /// Whether the ball reached the ground.
    #[must_use]
    pub fn landed(&self) -> bool {
        self.phase == Phase::Stopped
    }
}

/// Runs one drop and writes the report to `out`.
///
/// # Errors
///
/// Returns [`HeadlessError::Sim`] if the configured gravity is invalid, or
/// [`HeadlessError::Io`] if `out` fails.
pub fn simulate<W: Write>(
    config: &Config,
    args: &SimulateArgs,
    out: &mut W,
) -> Result<Report, HeadlessError> {
    let canvas = Canvas::fit(args.width, args.height, config.max_canvas);
    let mut sim = Simulation::new(canvas, Scale::default(), config.shadow_policy);
    let clock = ManualClock::new();
    sim.start_from_input(&config.gravity_input(), clock.now_ms())?;

    let driver = FrameDriver::new(clock, config.fps).with_max_frames(frame_limit(
        args.max_seconds,
        config.fps,
    ));
    let drive = driver.run(&mut sim, |sim, outcome| {
        tracing::trace!(t = sim.ball().time, ?outcome, "frame");
    });

    let fall = FreeFall::new(sim.start_position(), sim.ball().gravity, sim.scale());
    let drop_height = sim.resting_y() - sim.start_position().y;
    let report = Report {
        frames: drive.frames,
        phase: sim.phase(),
        elapsed: sim.ball().time,
        meters: sim.fallen_meters(),
        expected_landing: fall.time_to_fall(drop_height),
        shadows: sim.shadows().to_vec(),
    };

    writeln!(
        out,
        "g={} m/s² canvas={}x{}px ground={:.1}px",
        sim.ball().gravity.value(),
        canvas.width(),
        canvas.height(),
        sim.ground()
    )?;
    for shadow in &report.shadows {
        writeln!(
            out,
            "t={}s y={:.1}px distance={:.1}m",
            shadow.second,
            shadow.position.y,
            sim.scale().to_meters(shadow.distance)
        )?;
    }
    if report.landed() {
        writeln!(
            out,
            "landed t={:.3}s distance={:.2}m frames={} expected={:.3}s",
            report.elapsed, report.meters, report.frames, report.expected_landing
        )?;
    } else {
        writeln!(
            out,
            "still falling after {:.3}s ({} frames)",
            report.elapsed, report.frames
        )?;
    }

    if !args.no_frame {
        let (cols, rows) = frame_size(canvas, config);
        let labels = Labels::new(config.language);
        let input = config.gravity_input();
        let scene = Scene {
            sim: &sim,
            labels: &labels,
            gravity_input: &input,
            notice: false,
        };
        let raster = render::render(&scene, cols, rows, config.cell_size());
        writeln!(out)?;
        write!(out, "{}", raster.to_plain())?;
        writeln!(out)?;
    }

    Ok(report)
}

fn frame_limit(max_seconds: f64, fps: u32) -> usize {
    let frames = (max_seconds.max(0.0) * f64::from(fps)).ceil();
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let frames = frames.min(f64::from(u32::MAX)) as usize;
    frames
}

/// Terminal cells needed to show the whole canvas plus the panel.
fn frame_size(canvas: Canvas, config: &Config) -> (usize, usize) {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cells = |pixels: f64, per_cell: f64| (pixels / per_cell).ceil().max(1.0) as usize;
    (
        cells(canvas.width(), config.cell_width),
        cells(canvas.height(), config.cell_height) + PANEL_ROWS,
    )
}
