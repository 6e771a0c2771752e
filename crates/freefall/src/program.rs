//! Program lifecycle and event loop.
//!
//! The Program struct owns the terminal for the lifetime of the app:
//! raw mode, alternate screen, event polling, frame delivery and rendering.
//! Everything runs on one thread, so a start, reset or resize is fully
//! applied before the next frame is delivered.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};

use crate::messages::{Cmd, Key, Msg};
use crate::scheduler::FrameScheduler;

/// Errors that can occur when running the program.
///
/// | Error Variant | Recovery Strategy |
/// |--------------|-------------------|
/// | [`Io`](ProgramError::Io) | Check terminal availability, retry, or report to user |
/// | [`RawModeFailure`](ProgramError::RawModeFailure) | Check terminal compatibility |
/// | [`AltScreenFailure`](ProgramError::AltScreenFailure) | Run with `--no-alt-screen` |
/// | [`EventPoll`](ProgramError::EventPoll) | Terminal may be disconnected |
/// | [`Render`](ProgramError::Render) | Check output stream |
#[derive(thiserror::Error, Debug)]
pub enum ProgramError {
    /// I/O error during terminal operations.
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),

    /// Failed to enable or disable raw mode.
    #[error("failed to {action} raw mode: {source}")]
    RawModeFailure {
        /// Whether we were trying to enable or disable raw mode.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to enter or exit alternate screen.
    #[error("failed to {action} alternate screen: {source}")]
    AltScreenFailure {
        /// Whether we were trying to enter or exit alt screen.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to poll for terminal events.
    #[error("failed to poll terminal events: {0}")]
    EventPoll(io::Error),

    /// Failed to render the view to the terminal.
    #[error("failed to render view: {0}")]
    Render(io::Error),
}

/// A specialized [`Result`] type for program operations.
pub type Result<T> = std::result::Result<T, ProgramError>;

/// The Model trait for the Elm Architecture.
pub trait Model {
    /// Initialize the model and return an optional startup command.
    fn init(&self) -> Option<Cmd>;

    /// Process a message and return a new command.
    fn update(&mut self, msg: Msg) -> Option<Cmd>;

    /// Render the model as a string for display.
    fn view(&self) -> String;
}

/// Program options.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Use alternate screen buffer.
    pub alt_screen: bool,
    /// Target frames per second.
    pub fps: u32,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            fps: 60,
        }
    }
}

/// The main program runner.
///
/// ```rust,ignore
/// use freefall::{App, Program};
///
/// let final_model = Program::new(App::new(Default::default()))
///     .with_fps(60)
///     .run()?;
/// ```
pub struct Program<M: Model> {
    model: M,
    options: ProgramOptions,
}

impl<M: Model> Program<M> {
    /// Create a new program with the given model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            options: ProgramOptions::default(),
        }
    }

    /// Set whether to use the alternate screen buffer.
    #[must_use]
    pub const fn with_alt_screen(mut self, alt_screen: bool) -> Self {
        self.options.alt_screen = alt_screen;
        self
    }

    /// Set the target frames per second (clamped to 1-120).
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.options.fps = fps.clamp(1, 120);
        self
    }

    /// Run the program on stdout and return the final model state.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] if the terminal cannot be set up, polled or
    /// written to.
    pub fn run(self) -> Result<M> {
        self.run_with_writer(io::stdout())
    }

    /// Run the program with a custom writer.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] if the terminal cannot be set up, polled or
    /// written to.
    pub fn run_with_writer<W: Write>(self, mut writer: W) -> Result<M> {
        let options = self.options.clone();

        enable_raw_mode().map_err(|source| ProgramError::RawModeFailure {
            action: "enable",
            source,
        })?;

        if options.alt_screen
            && let Err(source) = execute!(writer, EnterAlternateScreen)
        {
            let _ = disable_raw_mode();
            return Err(ProgramError::AltScreenFailure {
                action: "enter",
                source,
            });
        }

        let _ = execute!(writer, Hide);

        let result = self.event_loop(&mut writer);

        let _ = execute!(writer, Show);
        if options.alt_screen {
            let _ = execute!(writer, LeaveAlternateScreen);
        }
        let _ = disable_raw_mode();

        result
    }

    fn event_loop<W: Write>(mut self, writer: &mut W) -> Result<M> {
        let mut queue: VecDeque<Msg> = VecDeque::new();
        let mut scheduler = FrameScheduler::new();

        if let Ok((cols, rows)) = terminal::size() {
            queue.push_back(Msg::Resize { cols, rows });
        }

        if let Some(cmd) = self.model.init()
            && apply(cmd, &mut scheduler)
        {
            return Ok(self.model);
        }

        let mut last_view = String::new();
        render(&self.model, writer, &mut last_view)?;

        let frame_duration = Duration::from_secs_f64(kinematics::fps(self.options.fps));

        loop {
            if event::poll(frame_duration).map_err(ProgramError::EventPoll)? {
                match event::read().map_err(ProgramError::EventPoll)? {
                    Event::Key(key_event) => {
                        // Only handle key press events, not release
                        if key_event.kind == KeyEventKind::Press {
                            let key = Key::from_crossterm(key_event.code, key_event.modifiers);
                            queue.push_back(Msg::Key(key));
                        }
                    }
                    Event::Resize(cols, rows) => {
                        queue.push_back(Msg::Resize { cols, rows });
                    }
                    _ => {}
                }
            }

            if scheduler.take() {
                queue.push_back(Msg::Frame);
            }

            let mut needs_render = false;
            while let Some(msg) = queue.pop_front() {
                if let Some(cmd) = self.model.update(msg)
                    && apply(cmd, &mut scheduler)
                {
                    return Ok(self.model);
                }
                needs_render = true;
            }

            if needs_render {
                render(&self.model, writer, &mut last_view)?;
            }
        }
    }
}

/// Applies `cmd` to the loop state. Returns `true` if the loop should end.
fn apply(cmd: Cmd, scheduler: &mut FrameScheduler) -> bool {
    match cmd {
        Cmd::RequestFrame => {
            scheduler.request();
            false
        }
        Cmd::CancelFrame => {
            scheduler.cancel();
            false
        }
        Cmd::Quit => true,
    }
}

fn render<M: Model, W: Write>(model: &M, writer: &mut W, last_view: &mut String) -> Result<()> {
    let view = model.view();

    // Skip if view hasn't changed
    if view == *last_view {
        return Ok(());
    }

    queue!(writer, MoveTo(0, 0), Clear(ClearType::All)).map_err(ProgramError::Render)?;
    for (row, line) in view.lines().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(writer, MoveTo(0, row), Print(line)).map_err(ProgramError::Render)?;
    }
    writer.flush().map_err(ProgramError::Render)?;

    *last_view = view;
    Ok(())
}
