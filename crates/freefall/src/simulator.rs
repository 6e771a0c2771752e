//! Program simulator for testing lifecycle without a real terminal.
//!
//! Messages are queued and processed one at a time exactly as the event
//! loop would, including the single pending-frame slot. Frames are only
//! delivered when the caller asks for them, so tests decide how much time
//! passes between frames.
//!
//! # Example
//!
//! ```rust
//! use freefall::app::{App, AppConfig};
//! use freefall::scheduler::ManualClock;
//! use freefall::simulator::ProgramSimulator;
//! use freefall::{Msg, Phase};
//!
//! let clock = ManualClock::new();
//! let app = App::with_clock(AppConfig::default(), clock.clone());
//! let mut sim = ProgramSimulator::new(app);
//!
//! sim.send(Msg::Start);
//! sim.run_until_empty();
//! while sim.frame_pending() {
//!     clock.advance(16.0);
//!     sim.deliver_frame();
//! }
//!
//! assert_eq!(sim.model().sim().phase(), Phase::Stopped);
//! ```

use std::collections::VecDeque;

use crate::messages::{Cmd, Msg};
use crate::program::Model;
use crate::scheduler::FrameScheduler;

/// Statistics tracked during simulation.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Number of times init() was called.
    pub init_calls: usize,
    /// Number of times update() was called.
    pub update_calls: usize,
    /// Number of times view() was called.
    pub view_calls: usize,
    /// Frames delivered.
    pub frames: usize,
    /// Whether quit was requested.
    pub quit_requested: bool,
}

/// A simulator for testing Model implementations without a terminal.
pub struct ProgramSimulator<M: Model> {
    model: M,
    input_queue: VecDeque<Msg>,
    scheduler: FrameScheduler,
    output_views: Vec<String>,
    stats: SimulationStats,
    initialized: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Create a new simulator with the given model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            input_queue: VecDeque::new(),
            scheduler: FrameScheduler::new(),
            output_views: Vec::new(),
            stats: SimulationStats::default(),
            initialized: false,
        }
    }

    /// Initialize the model, calling init() and capturing the first view.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.stats.init_calls += 1;

        if let Some(cmd) = self.model.init() {
            self.apply(cmd);
        }

        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());
    }

    /// Queue a message for processing.
    pub fn send(&mut self, msg: Msg) {
        self.input_queue.push_back(msg);
    }

    /// Process one message from the queue, calling update and view.
    ///
    /// Returns the command returned by update, if any.
    pub fn step(&mut self) -> Option<Cmd> {
        if !self.initialized {
            self.init();
        }
        if self.stats.quit_requested {
            return None;
        }

        let msg = self.input_queue.pop_front()?;
        self.stats.update_calls += 1;
        let cmd = self.model.update(msg);
        if let Some(cmd) = cmd {
            self.apply(cmd);
        }

        self.stats.view_calls += 1;
        self.output_views.push(self.model.view());
        cmd
    }

    fn apply(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::RequestFrame => self.scheduler.request(),
            Cmd::CancelFrame => self.scheduler.cancel(),
            Cmd::Quit => self.stats.quit_requested = true,
        }
    }

    /// Process all pending messages until the queue is empty or quit is requested.
    ///
    /// Returns the number of messages processed.
    pub fn run_until_empty(&mut self) -> usize {
        let mut processed = 0;
        while !self.input_queue.is_empty() && !self.stats.quit_requested {
            self.step();
            processed += 1;
        }
        processed
    }

    /// Whether the model asked for a frame that has not been delivered.
    pub const fn frame_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Delivers the pending frame, if any. Returns `true` if one was delivered.
    pub fn deliver_frame(&mut self) -> bool {
        if !self.scheduler.take() {
            return false;
        }
        self.stats.frames += 1;
        self.send(Msg::Frame);
        self.run_until_empty();
        true
    }

    /// Get a reference to the current model state.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Consume the simulator and return the final model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Get the simulation statistics.
    pub const fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Get all captured view outputs.
    pub fn views(&self) -> &[String] {
        &self.output_views
    }

    /// Get the most recent view output.
    pub fn last_view(&self) -> Option<&str> {
        self.output_views.last().map(String::as_str)
    }

    /// Check if quit has been requested.
    pub const fn is_quit(&self) -> bool {
        self.stats.quit_requested
    }
}
