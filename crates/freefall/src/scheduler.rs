//! Frame timing.
//!
//! The simulation only advances when a frame is delivered, and a frame is
//! only delivered if one was requested. A running simulation re-requests
//! after every step; once it stops, nothing requests another frame and the
//! loop goes quiet on its own.
//!
//! - [`Clock`] abstracts "now" so the same driver runs on wall-clock time
//!   in the terminal and on virtual time in tests and headless mode.
//! - [`FrameScheduler`] holds the single pending request of the event loop.
//! - [`FrameDriver`] runs a simulation to completion without a terminal.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::sim::{Simulation, StepOutcome};

/// Source of frame timestamps, in milliseconds.
pub trait Clock {
    /// Current timestamp.
    fn now_ms(&self) -> f64;

    /// Lets `ms` milliseconds pass.
    fn wait(&self, ms: f64);
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Starts counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    fn wait(&self, ms: f64) {
        if ms > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(ms / 1000.0));
        }
    }
}

/// Virtual time that only moves when told to.
///
/// Clones share the same time, so a test can keep a handle while the model
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// A clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `ms`.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Jumps to `ms`.
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn wait(&self, ms: f64) {
        self.advance(ms);
    }
}

/// The event loop's pending-frame slot.
///
/// Holds at most one request, so two runs can never drive frames at the
/// same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    /// An empty scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: false }
    }

    /// Asks for a frame on the next tick.
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Drops the pending request, if any.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Whether a frame is waiting to be delivered.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consumes the pending request. Returns `true` if a frame is due.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Summary of a driven run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveReport {
    /// Frames delivered.
    pub frames: usize,
    /// Outcome of the last frame.
    pub last: StepOutcome,
    /// Whether the frame budget ran out before the ball stopped.
    pub truncated: bool,
}

/// Runs a simulation frame by frame until it stops.
#[derive(Debug, Clone)]
pub struct FrameDriver<C: Clock> {
    clock: C,
    frame_ms: f64,
    max_frames: usize,
}

impl<C: Clock> FrameDriver<C> {
    /// A driver ticking every `1000 / fps` milliseconds on `clock`.
    #[must_use]
    pub fn new(clock: C, fps: u32) -> Self {
        Self {
            clock,
            frame_ms: kinematics::fps(fps.max(1)) * 1000.0,
            max_frames: usize::MAX,
        }
    }

    /// Gives up after `max_frames` frames.
    #[must_use]
    pub const fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Frame interval in milliseconds.
    #[must_use]
    pub const fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// The driver's clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Delivers frames while `sim` is running, calling `on_frame` after each.
    pub fn run<F>(&self, sim: &mut Simulation, mut on_frame: F) -> DriveReport
    where
        F: FnMut(&Simulation, StepOutcome),
    {
        let mut scheduler = FrameScheduler::new();
        if sim.is_running() {
            scheduler.request();
        }

        let mut report = DriveReport {
            frames: 0,
            last: StepOutcome::Skipped,
            truncated: false,
        };

        while scheduler.take() {
            if report.frames >= self.max_frames {
                report.truncated = true;
                break;
            }
            self.clock.wait(self.frame_ms);
            let outcome = sim.frame(self.clock.now_ms());
            report.frames += 1;
            report.last = outcome;
            on_frame(sim, outcome);
            if outcome.keeps_running() {
                scheduler.request();
            }
        }

        tracing::debug!(frames = report.frames, truncated = report.truncated, "drive finished");
        report
    }
}
