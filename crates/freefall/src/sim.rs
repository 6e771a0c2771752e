//! Simulation state and the per-frame stepper.
//!
//! A [`Simulation`] owns the ball, the run state and the canvas. It moves
//! through three phases:
//!
//! ```text
//!            start(g)                 ground contact
//!   Idle ─────────────────► Running ─────────────────► Stopped
//!    ▲                        │  ▲                        │
//!    │                        └──┘ frame                  │
//!    └──────────────────── reset (from any phase) ────────┘
//! ```
//!
//! Positions are evaluated in closed form from the elapsed time, so a step
//! never accumulates error. Only the elapsed time itself is accumulated from
//! frame deltas.

use kinematics::{FreeFall, Gravity, Point, Scale};
use serde::{Deserialize, Serialize};

use crate::ball::{Ball, Shadow};
use crate::error::{SimError, SimResult};
use crate::viewport::Canvas;

/// Lifecycle phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for a start.
    #[default]
    Idle,
    /// Falling; frames advance the ball.
    Running,
    /// Resting on the ground until reset.
    Stopped,
}

/// How to treat a frame whose delta crosses several whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowPolicy {
    /// Emit at most one shadow per frame; the rest follow on later frames.
    #[default]
    OnePerFrame,
    /// Emit a shadow for every whole second crossed, up to
    /// [`MAX_CATCH_UP_SHADOWS`] per frame.
    CatchUp,
}

impl ShadowPolicy {
    const fn per_frame(self) -> usize {
        match self {
            Self::OnePerFrame => 1,
            Self::CatchUp => MAX_CATCH_UP_SHADOWS,
        }
    }
}

/// Most shadows a single catch-up frame appends. Any backlog follows on
/// later frames.
pub const MAX_CATCH_UP_SHADOWS: usize = 120;

/// What a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not running; nothing changed.
    Skipped,
    /// The ball moved and is still falling.
    Advanced {
        /// Shadows appended during this step.
        shadows: usize,
    },
    /// The ball reached the ground during this step.
    Landed {
        /// Shadows appended during this step.
        shadows: usize,
    },
}

impl StepOutcome {
    /// Whether another frame should be scheduled.
    #[must_use]
    pub const fn keeps_running(self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

/// Run bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunState {
    /// Current phase.
    pub phase: Phase,
    /// Last whole second that has a shadow.
    pub last_shadow_second: u32,
    /// Timestamp of the previous frame, in milliseconds.
    pub last_timestamp: Option<f64>,
}

/// Everything a frame needs: ball, run state and canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    ball: Ball,
    run: RunState,
    canvas: Canvas,
    scale: Scale,
    policy: ShadowPolicy,
}

impl Simulation {
    /// An idle simulation on `canvas`, ball at the release point.
    #[must_use]
    pub fn new(canvas: Canvas, scale: Scale, policy: ShadowPolicy) -> Self {
        let radius = scale.to_pixels(1.0);
        let ball = Ball::new(Point::new(canvas.center_x(), canvas.start_y(radius)), scale);
        Self {
            ball,
            run: RunState::default(),
            canvas,
            scale,
            policy,
        }
    }

    /// The ball.
    #[must_use]
    pub const fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Run bookkeeping.
    #[must_use]
    pub const fn run_state(&self) -> &RunState {
        &self.run
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.run.phase
    }

    /// Whether frames currently advance the ball.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.run.phase, Phase::Running)
    }

    /// Shadows of the current run, oldest first.
    #[must_use]
    pub fn shadows(&self) -> &[Shadow] {
        &self.ball.shadows
    }

    /// The canvas.
    #[must_use]
    pub const fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Pixels per meter.
    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Shadow emission policy.
    #[must_use]
    pub const fn policy(&self) -> ShadowPolicy {
        self.policy
    }

    /// Ground line in pixels.
    #[must_use]
    pub fn ground(&self) -> f64 {
        self.canvas.ground(self.ball.radius)
    }

    /// Release point for the current canvas.
    #[must_use]
    pub fn start_position(&self) -> Point {
        Point::new(
            self.canvas.center_x(),
            self.canvas.start_y(self.ball.radius),
        )
    }

    /// Lowest y the ball's center may take.
    #[must_use]
    pub fn resting_y(&self) -> f64 {
        self.ground() - self.ball.radius
    }

    /// Distance fallen so far, in meters.
    #[must_use]
    pub fn fallen_meters(&self) -> f64 {
        self.scale
            .to_meters(self.ball.position.y - self.start_position().y)
            .max(0.0)
    }

    fn fall(&self) -> FreeFall {
        FreeFall::new(self.start_position(), self.ball.gravity, self.scale)
    }

    /// Parses `input` as an acceleration and starts a run.
    ///
    /// # Errors
    ///
    /// Returns [`SimError`] if `input` is not a positive finite number. No
    /// state is touched in that case.
    pub fn start_from_input(&mut self, input: &str, now_ms: f64) -> SimResult<()> {
        let trimmed = input.trim();
        let value: f64 = trimmed.parse().map_err(|_| SimError::NotANumber {
            input: trimmed.to_string(),
        })?;
        let gravity = Gravity::new(value)?;
        self.start(gravity, now_ms);
        Ok(())
    }

    /// Starts a run with `gravity`, discarding any previous run.
    pub fn start(&mut self, gravity: Gravity, now_ms: f64) {
        if self.is_running() {
            tracing::debug!(
                elapsed = self.ball.time,
                shadows = self.ball.shadows.len(),
                "discarding active run"
            );
        }
        self.ball.gravity = gravity;
        self.rewind();
        self.run.phase = Phase::Running;
        self.run.last_timestamp = Some(now_ms);
        tracing::info!(gravity = gravity.value(), "run started");
    }

    /// Returns to Idle at the release point with only the origin shadow.
    pub fn reset(&mut self) {
        self.rewind();
        self.run.phase = Phase::Idle;
        self.run.last_timestamp = None;
        tracing::info!("simulation reset");
    }

    fn rewind(&mut self) {
        let start = self.start_position();
        self.ball.time = 0.0;
        self.ball.position = start;
        self.ball.shadows.clear();
        self.ball.shadows.push(Shadow::origin(start));
        self.run.last_shadow_second = 0;
    }

    /// Handles one frame at wall-clock `now_ms`.
    ///
    /// The delta since the previous frame is accumulated into the elapsed
    /// time (a clock going backwards counts as zero), then one step runs.
    pub fn frame(&mut self, now_ms: f64) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Skipped;
        }
        let previous = self.run.last_timestamp.unwrap_or(now_ms);
        self.run.last_timestamp = Some(now_ms);
        let delta = ((now_ms - previous) / 1000.0).max(0.0);
        self.step(delta)
    }

    /// Advances the elapsed time by `dt` seconds and re-evaluates the ball.
    pub fn step(&mut self, dt: f64) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Skipped;
        }

        self.ball.time += dt.max(0.0);
        let fall = self.fall();
        self.ball.position = fall.position_at(self.ball.time);

        let landed = self.ball.bottom() >= self.ground();
        if landed {
            self.ball.position.y = self.resting_y();
            self.run.phase = Phase::Stopped;
        }

        let shadows = self.emit_shadows(&fall);

        if landed {
            tracing::info!(
                elapsed = self.ball.time,
                meters = self.fallen_meters(),
                shadows = self.ball.shadows.len(),
                "ball reached the ground"
            );
            StepOutcome::Landed { shadows }
        } else {
            StepOutcome::Advanced { shadows }
        }
    }

    fn emit_shadows(&mut self, fall: &FreeFall) -> usize {
        let mut horizon = self.ball.time;
        if self.policy == ShadowPolicy::CatchUp && self.run.phase == Phase::Stopped {
            // Catching up never marks seconds after the ball came to rest.
            let drop = self.resting_y() - self.start_position().y;
            horizon = horizon.min(fall.time_to_fall(drop));
        }
        let whole = horizon.floor();
        let mut emitted = 0;
        let limit = self.policy.per_frame();
        while emitted < limit && whole > f64::from(self.run.last_shadow_second) {
            // The marker saturates; no shadow past u32::MAX seconds.
            let Some(second) = self.run.last_shadow_second.checked_add(1) else {
                break;
            };
            let t = f64::from(second);
            let shadow = Shadow {
                position: fall.position_at(t),
                second,
                distance: fall.displacement_at(t),
            };
            tracing::debug!(second, distance = shadow.distance, "shadow emitted");
            self.ball.shadows.push(shadow);
            self.run.last_shadow_second = second;
            emitted += 1;
        }
        emitted
    }

    /// Applies a new canvas. Phase and elapsed time are kept.
    ///
    /// The ball is re-derived for the new geometry: at the release point
    /// when Idle, on its trajectory when Running, on the ground when Stopped.
    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.ball.radius = self.scale.to_pixels(1.0);
        let start = self.start_position();
        self.ball.position = match self.run.phase {
            Phase::Idle => start,
            Phase::Running => {
                let mut p = self.fall().position_at(self.ball.time);
                p.y = p.y.min(self.resting_y());
                p
            }
            Phase::Stopped => Point::new(start.x, self.resting_y()),
        };
        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            ground = self.ground(),
            "canvas resized"
        );
    }
}
