//! The interactive model.
//!
//! `App` wires the simulation, the label map and the gravity input to the
//! event loop:
//! - keys edit the input, start, reset, switch language or quit
//! - a successful start requests a frame; every frame that leaves the ball
//!   falling requests the next one
//! - a rejected start opens a notification that swallows keys until dismissed

use kinematics::Scale;

use crate::i18n::{Labels, Language};
use crate::messages::{Cmd, Key, Msg};
use crate::program::Model;
use crate::render::{self, CellSize, PANEL_ROWS, Scene};
use crate::scheduler::{Clock, MonotonicClock};
use crate::sim::{ShadowPolicy, Simulation};
use crate::viewport::{Canvas, MAX_CANVAS};

/// Longest accepted gravity input, in characters.
const MAX_INPUT_LEN: usize = 16;

/// Terminal size assumed until the first resize arrives.
const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Initial text of the gravity input.
    pub gravity_input: String,
    /// Initial language.
    pub language: Language,
    /// Pixels per terminal cell.
    pub cell: CellSize,
    /// Largest canvas edge in pixels.
    pub max_canvas: f64,
    /// Shadow emission policy.
    pub shadow_policy: ShadowPolicy,
    /// Emit ANSI colors.
    pub color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gravity_input: kinematics::EARTH_GRAVITY.to_string(),
            language: Language::En,
            cell: CellSize::default(),
            max_canvas: MAX_CANVAS,
            shadow_policy: ShadowPolicy::OnePerFrame,
            color: true,
        }
    }
}

/// Main application state.
pub struct App<C: Clock = MonotonicClock> {
    config: AppConfig,
    sim: Simulation,
    labels: Labels,
    input: String,
    notice: bool,
    cols: u16,
    rows: u16,
    clock: C,
}

impl App<MonotonicClock> {
    /// Creates the app on wall-clock time.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> App<C> {
    /// Creates the app on `clock`.
    #[must_use]
    pub fn with_clock(config: AppConfig, clock: C) -> Self {
        let (cols, rows) = DEFAULT_SIZE;
        let sim = Simulation::new(
            canvas_for(&config, cols, rows),
            Scale::default(),
            config.shadow_policy,
        );
        Self {
            labels: Labels::new(config.language),
            input: config.gravity_input.clone(),
            sim,
            notice: false,
            cols,
            rows,
            clock,
            config,
        }
    }

    /// The simulation.
    #[must_use]
    pub const fn sim(&self) -> &Simulation {
        &self.sim
    }

    /// Current labels.
    #[must_use]
    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Text of the gravity input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the invalid-input notification is open.
    #[must_use]
    pub const fn notice_open(&self) -> bool {
        self.notice
    }

    /// Terminal size in cells.
    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn handle_key(&mut self, key: Key) -> Option<Cmd> {
        if self.notice {
            return match key {
                Key::CtrlC => Some(Cmd::Quit),
                _ => self.update(Msg::Dismiss),
            };
        }

        match key {
            Key::CtrlC | Key::Esc | Key::Char('q') => Some(Cmd::Quit),
            Key::Enter | Key::Char('s') => self.update(Msg::Start),
            Key::Char('r') => self.update(Msg::Reset),
            Key::Char('l') => self.update(Msg::CycleLanguage),
            Key::Char(c) if is_number_char(c) => {
                if self.input.chars().count() < MAX_INPUT_LEN {
                    self.input.push(c);
                }
                None
            }
            Key::Backspace => {
                self.input.pop();
                None
            }
            Key::Char(_) | Key::Other => None,
        }
    }

    fn start(&mut self) -> Option<Cmd> {
        match self.sim.start_from_input(&self.input, self.clock.now_ms()) {
            Ok(()) => Some(Cmd::RequestFrame),
            Err(err) => {
                tracing::warn!(input = %self.input, error = %err, "start rejected");
                self.notice = true;
                None
            }
        }
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
}

/// Canvas for a terminal of `cols` × `rows` cells; the panel rows are not
/// part of the host area.
fn canvas_for(config: &AppConfig, cols: u16, rows: u16) -> Canvas {
    let usable_rows = usize::from(rows).saturating_sub(PANEL_ROWS);
    #[expect(clippy::cast_precision_loss)]
    let (width, height) = (
        f64::from(cols) * config.cell.width,
        usable_rows as f64 * config.cell.height,
    );
    Canvas::fit(width, height, config.max_canvas)
}

impl<C: Clock> Model for App<C> {
    fn init(&self) -> Option<Cmd> {
        tracing::debug!(language = %self.labels.language(), "app initialised");
        None
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { cols, rows } => {
                self.cols = cols;
                self.rows = rows;
                self.sim.resize(canvas_for(&self.config, cols, rows));
                None
            }
            Msg::Frame => self
                .sim
                .frame(self.clock.now_ms())
                .keeps_running()
                .then_some(Cmd::RequestFrame),
            Msg::Start => self.start(),
            Msg::Reset => {
                self.sim.reset();
                Some(Cmd::CancelFrame)
            }
            Msg::SetLanguage(language) => {
                self.labels.set_language(language);
                None
            }
            Msg::CycleLanguage => {
                self.labels.set_language(self.labels.language().next());
                None
            }
            Msg::Dismiss => {
                self.notice = false;
                None
            }
            Msg::Quit => Some(Cmd::Quit),
        }
    }

    fn view(&self) -> String {
        let scene = Scene {
            sim: &self.sim,
            labels: &self.labels,
            gravity_input: &self.input,
            notice: self.notice,
        };
        let raster = render::render(
            &scene,
            usize::from(self.cols),
            usize::from(self.rows),
            self.config.cell,
        );
        if self.config.color {
            raster.to_ansi()
        } else {
            raster.to_plain()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualClock;
    use crate::sim::Phase;

    fn app() -> (App<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let config = AppConfig {
            color: false,
            ..AppConfig::default()
        };
        (App::with_clock(config, clock.clone()), clock)
    }

    fn type_text(app: &mut App<ManualClock>, text: &str) {
        for c in text.chars() {
            app.update(Msg::Key(Key::Char(c)));
        }
    }

    #[test]
    fn editing_gravity_input() {
        let (mut app, _) = app();
        assert_eq!(app.input(), "9.8");
        app.update(Msg::Key(Key::Backspace));
        app.update(Msg::Key(Key::Backspace));
        app.update(Msg::Key(Key::Backspace));
        type_text(&mut app, "1.62x");
        assert_eq!(app.input(), "1.62");
    }

    #[test]
    fn input_length_is_capped() {
        let (mut app, _) = app();
        type_text(&mut app, &"1".repeat(40));
        assert_eq!(app.input().chars().count(), MAX_INPUT_LEN);
    }

    #[test]
    fn start_requests_frames_until_landing() {
        let (mut app, clock) = app();
        assert_eq!(app.update(Msg::Key(Key::Enter)), Some(Cmd::RequestFrame));
        clock.advance(16.0);
        assert_eq!(app.update(Msg::Frame), Some(Cmd::RequestFrame));
        clock.advance(60_000.0);
        assert_eq!(app.update(Msg::Frame), None);
        assert_eq!(app.sim().phase(), Phase::Stopped);
    }

    #[test]
    fn invalid_input_opens_notice_and_keeps_state() {
        let (mut app, _) = app();
        for _ in 0..3 {
            app.update(Msg::Key(Key::Backspace));
        }
        type_text(&mut app, "-5");
        assert_eq!(app.update(Msg::Start), None);
        assert!(app.notice_open());
        assert_eq!(app.sim().phase(), Phase::Idle);
        assert_eq!(app.sim().shadows().len(), 1);

        // Keys are swallowed while the notice is open.
        app.update(Msg::Key(Key::Char('r')));
        assert!(!app.notice_open());
        assert_eq!(app.input(), "-5");
    }

    #[test]
    fn reset_cancels_pending_frame() {
        let (mut app, clock) = app();
        app.update(Msg::Start);
        clock.advance(16.0);
        app.update(Msg::Frame);
        assert_eq!(app.update(Msg::Key(Key::Char('r'))), Some(Cmd::CancelFrame));
        assert_eq!(app.sim().phase(), Phase::Idle);
    }

    #[test]
    fn ctrl_c_quits_even_with_notice() {
        let (mut app, _) = app();
        app.update(Msg::Key(Key::Backspace));
        app.update(Msg::Key(Key::Backspace));
        app.update(Msg::Key(Key::Backspace));
        app.update(Msg::Start);
        assert!(app.notice_open());
        assert_eq!(app.update(Msg::Key(Key::CtrlC)), Some(Cmd::Quit));
    }

    #[test]
    fn language_cycle_leaves_simulation_alone() {
        let (mut app, clock) = app();
        app.update(Msg::Start);
        clock.advance(500.0);
        app.update(Msg::Frame);
        let before = app.sim().clone();
        app.update(Msg::Key(Key::Char('l')));
        assert_eq!(app.labels().language(), Language::Kk);
        app.update(Msg::SetLanguage(Language::Ru));
        assert_eq!(app.labels().language(), Language::Ru);
        assert_eq!(app.sim(), &before);
    }

    #[test]
    fn resize_rebuilds_canvas() {
        let (mut app, _) = app();
        app.update(Msg::Resize {
            cols: 100,
            rows: 43,
        });
        assert_eq!(app.size(), (100, 43));
        // 100 cols * 4 px * 0.8 = 320 px wide, 40 rows * 8 px * 0.9 = 288 px high.
        assert!((app.sim().canvas().width() - 320.0).abs() < 1e-9);
        assert!((app.sim().canvas().height() - 288.0).abs() < 1e-9);
    }

    #[test]
    fn view_shows_title_and_panel() {
        let (mut app, _) = app();
        app.update(Msg::Resize {
            cols: 100,
            rows: 43,
        });
        let view = app.view();
        assert!(view.contains("Physics in Action: Free Fall"));
        assert!(view.contains("Gravity (m/s²): [9.8"));
        assert!(!view.contains('\u{1b}'));
    }
}
