//! Scene rasterisation.
//!
//! [`render`] is a pure function from a [`Scene`] to a [`Raster`] of
//! terminal cells. The canvas is pixel space; each cell covers
//! [`CellSize`] pixels. Below the canvas sit [`PANEL_ROWS`] rows of
//! controls and status.

use std::fmt::Write as _;

use crossterm::style::{Attribute, Attributes, Color, ContentStyle};
use kinematics::Scale;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ball::Shadow;
use crate::i18n::{LabelKey, Labels, Language};
use crate::sim::{Phase, Simulation};

/// Rows reserved under the canvas for the control panel.
pub const PANEL_ROWS: usize = 3;

/// Horizontal gap between a shadow marker and its label, in pixels.
const SHADOW_LABEL_GAP: f64 = 20.0;

const BALL_GLYPH: char = '█';
const SHADOW_GLYPH: char = '░';
const GROUND_GLYPH: char = '█';
/// Placeholder behind the right half of a double-width glyph.
const CONTINUATION: char = '\0';

/// Pixels covered by one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    /// Pixels per column.
    pub width: f64,
    /// Pixels per row.
    pub height: f64,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 4.0,
            height: 8.0,
        }
    }
}

impl CellSize {
    fn col(self, x: f64) -> isize {
        to_index(x / self.width)
    }

    fn row(self, y: f64) -> isize {
        to_index(y / self.height)
    }

    fn span(self, pixels: f64, per_cell: f64) -> usize {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (pixels / per_cell).ceil().max(0.0) as usize;
        n
    }
}

#[expect(clippy::cast_possible_truncation)]
fn to_index(v: f64) -> isize {
    v.floor() as isize
}

/// Foreground color and attributes of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color; terminal default when `None`.
    pub fg: Option<Color>,
    /// Bold.
    pub bold: bool,
    /// Dim.
    pub dim: bool,
}

impl Style {
    /// Plain default style.
    pub const PLAIN: Self = Self {
        fg: None,
        bold: false,
        dim: false,
    };

    /// A colored style.
    #[must_use]
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            bold: false,
            dim: false,
        }
    }

    /// Adds bold.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Adds dim.
    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    fn content_style(self) -> ContentStyle {
        let mut attributes = Attributes::default();
        if self.bold {
            attributes.set(Attribute::Bold);
        }
        if self.dim {
            attributes.set(Attribute::Dim);
        }
        ContentStyle {
            foreground_color: self.fg,
            attributes,
            ..ContentStyle::default()
        }
    }
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Glyph.
    pub ch: char,
    /// Style.
    pub style: Style,
}

impl Cell {
    const BLANK: Self = Self {
        ch: ' ',
        style: Style::PLAIN,
    };
}

/// A grid of styled cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Raster {
    /// A blank raster.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    /// Columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, col: isize, row: isize) -> Option<usize> {
        let col = usize::try_from(col).ok()?;
        let row = usize::try_from(row).ok()?;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    /// Cell at (`col`, `row`), if in bounds.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<Cell> {
        let col = isize::try_from(col).ok()?;
        let row = isize::try_from(row).ok()?;
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Writes one cell; out-of-bounds writes are dropped.
    pub fn set(&mut self, col: isize, row: isize, ch: char, style: Style) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Cell { ch, style };
        }
    }

    /// Writes `text` starting at (`col`, `row`), clipped to the raster.
    pub fn put_str(&mut self, col: isize, row: isize, text: &str, style: Style) {
        let mut c = col;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.set(c, row, ch, style);
            if width == 2 {
                self.set(c + 1, row, CONTINUATION, style);
            }
            c += isize::try_from(width).unwrap_or(1);
        }
    }

    /// Writes `text` centered on `row` within `[0, width)`.
    pub fn put_centered(&mut self, row: isize, width: usize, text: &str, style: Style) {
        let w = text.width();
        let col = width.saturating_sub(w) / 2;
        self.put_str(isize::try_from(col).unwrap_or(0), row, text, style);
    }

    /// Plain text of one row, trailing blanks trimmed.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row * self.cols;
        let line: String = self.cells[start..start + self.cols]
            .iter()
            .map(|c| c.ch)
            .filter(|&ch| ch != CONTINUATION)
            .collect();
        line.trim_end().to_string()
    }

    /// Plain text of the whole raster, one line per row.
    #[must_use]
    pub fn to_plain(&self) -> String {
        (0..self.rows)
            .map(|r| self.row_text(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// ANSI-styled text, one line per row. Consecutive cells sharing a
    /// style are emitted as a single run.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for row in 0..self.rows {
            if row > 0 {
                out.push('\n');
            }
            let start = row * self.cols;
            let mut run = String::new();
            let mut run_style = Style::PLAIN;
            for cell in &self.cells[start..start + self.cols] {
                if cell.ch == CONTINUATION {
                    continue;
                }
                if cell.style != run_style && !run.is_empty() {
                    flush_run(&mut out, &run, run_style);
                    run.clear();
                }
                run_style = cell.style;
                run.push(cell.ch);
            }
            let trimmed = run.trim_end();
            if !trimmed.is_empty() {
                flush_run(&mut out, trimmed, run_style);
            }
        }
        out
    }
}

fn flush_run(out: &mut String, run: &str, style: Style) {
    if style == Style::PLAIN {
        out.push_str(run);
    } else {
        let _ = write!(out, "{}", style.content_style().apply(run));
    }
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Simulation snapshot.
    pub sim: &'a Simulation,
    /// Current labels.
    pub labels: &'a Labels,
    /// Text of the gravity input.
    pub gravity_input: &'a str,
    /// Whether the invalid-input notification is open.
    pub notice: bool,
}

/// Rasterises `scene` into a `cols` × `rows` grid.
#[must_use]
pub fn render(scene: &Scene<'_>, cols: usize, rows: usize, cell: CellSize) -> Raster {
    let mut raster = Raster::new(cols, rows);
    let sim = scene.sim;
    let canvas = sim.canvas();

    let canvas_cols = cell.span(canvas.width(), cell.width).min(cols);
    let canvas_rows = cell
        .span(canvas.height(), cell.height)
        .min(rows.saturating_sub(PANEL_ROWS));

    let mut surface = Raster::new(canvas_cols, canvas_rows);
    draw_ground(&mut surface, sim, cell);
    surface.put_centered(
        1,
        canvas_cols,
        scene.labels.get(LabelKey::Title),
        Style::fg(Color::Blue).bold(),
    );
    draw_shadows(&mut surface, sim, cell);
    let ball = sim.ball();
    draw_disc(
        &mut surface,
        cell,
        (ball.position.x, ball.position.y),
        ball.radius,
        BALL_GLYPH,
        Style::fg(ball.color),
    );
    if scene.notice {
        draw_notice(
            &mut surface,
            scene.labels.get(LabelKey::InvalidGravity),
        );
    }
    blit(&mut raster, &surface);

    draw_panel(&mut raster, scene, canvas_rows);
    raster
}

fn blit(dst: &mut Raster, src: &Raster) {
    for row in 0..src.rows {
        for col in 0..src.cols {
            if let Some(c) = src.get(col, row) {
                dst.set(
                    isize::try_from(col).unwrap_or(isize::MAX),
                    isize::try_from(row).unwrap_or(isize::MAX),
                    c.ch,
                    c.style,
                );
            }
        }
    }
}

fn draw_ground(surface: &mut Raster, sim: &Simulation, cell: CellSize) {
    let top = cell.row(sim.ground()).max(0);
    let bottom = isize::try_from(surface.rows()).unwrap_or(isize::MAX);
    let width = isize::try_from(surface.cols()).unwrap_or(isize::MAX);
    for row in top..bottom {
        for col in 0..width {
            surface.set(col, row, GROUND_GLYPH, Style::fg(Color::Green));
        }
    }
}

fn draw_shadows(surface: &mut Raster, sim: &Simulation, cell: CellSize) {
    let radius = sim.ball().radius;
    let scale = sim.scale();
    for shadow in sim.shadows() {
        draw_disc(
            surface,
            cell,
            (shadow.position.x, shadow.position.y),
            radius,
            SHADOW_GLYPH,
            Style::fg(Color::Blue).dim(),
        );
        draw_shadow_label(surface, cell, shadow, radius, scale);
    }
}

fn draw_shadow_label(
    surface: &mut Raster,
    cell: CellSize,
    shadow: &Shadow,
    radius: f64,
    scale: Scale,
) {
    let col = cell.col(shadow.position.x + radius + SHADOW_LABEL_GAP);
    let row = cell.row(shadow.position.y);
    surface.put_str(col, row, &shadow.label(scale), Style::PLAIN.bold());
}

fn draw_disc(
    surface: &mut Raster,
    cell: CellSize,
    center: (f64, f64),
    radius: f64,
    glyph: char,
    style: Style,
) {
    let (cx, cy) = center;
    let mut filled = false;
    for row in cell.row(cy - radius)..=cell.row(cy + radius) {
        for col in cell.col(cx - radius)..=cell.col(cx + radius) {
            #[expect(clippy::cast_precision_loss)]
            let (px, py) = (
                (col as f64 + 0.5) * cell.width,
                (row as f64 + 0.5) * cell.height,
            );
            let (dx, dy) = (px - cx, py - cy);
            if dx * dx + dy * dy <= radius * radius {
                surface.set(col, row, glyph, style);
                filled = true;
            }
        }
    }
    if !filled {
        surface.set(cell.col(cx), cell.row(cy), glyph, style);
    }
}

fn draw_notice(surface: &mut Raster, message: &str) {
    let max_inner = surface.cols().saturating_sub(6).clamp(10, 56);
    let lines: Vec<String> = textwrap::wrap(message, max_inner)
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    let ok = "[ OK ]";
    let inner = lines
        .iter()
        .map(|l| l.width())
        .chain(std::iter::once(ok.width()))
        .max()
        .unwrap_or(0);

    let box_w = inner + 4;
    let box_h = lines.len() + 4;
    let left = isize::try_from(surface.cols().saturating_sub(box_w) / 2).unwrap_or(0);
    let top = isize::try_from(surface.rows().saturating_sub(box_h) / 2).unwrap_or(0);
    let border = Style::fg(Color::Red).bold();

    let horizontal = "─".repeat(inner + 2);
    surface.put_str(left, top, &format!("┌{horizontal}┐"), border);
    let blank = " ".repeat(inner);
    let mut row = top + 1;
    for line in lines.iter().map(String::as_str).chain([""]) {
        surface.put_str(left, row, &format!("│ {blank} │"), border);
        surface.put_str(left + 2, row, line, Style::PLAIN.bold());
        row += 1;
    }
    surface.put_str(left, row, &format!("│ {blank} │"), border);
    let ok_col = left + 2 + isize::try_from((inner - ok.width()) / 2).unwrap_or(0);
    surface.put_str(ok_col, row, ok, Style::fg(Color::Red).bold());
    row += 1;
    surface.put_str(left, row, &format!("└{horizontal}┘"), border);
}

fn draw_panel(raster: &mut Raster, scene: &Scene<'_>, top: usize) {
    let labels = scene.labels;
    let top = isize::try_from(top).unwrap_or(isize::MAX);
    let accent = Style::fg(Color::Cyan).bold();

    let mut col = 0;
    let mut put = |raster: &mut Raster, text: &str, style: Style| {
        raster.put_str(col, top, text, style);
        col += isize::try_from(text.width()).unwrap_or(0);
    };
    put(raster, labels.get(LabelKey::GravityLabel), Style::PLAIN);
    put(raster, " [", Style::PLAIN);
    put(raster, scene.gravity_input, accent);
    put(raster, "▏]   ", Style::PLAIN);
    put(raster, "⏎ ", Style::PLAIN.dim());
    put(raster, labels.get(LabelKey::Start), accent);
    put(raster, "   r ", Style::PLAIN.dim());
    put(raster, labels.get(LabelKey::Reset), accent);
    put(raster, "   ", Style::PLAIN);
    put(raster, labels.get(LabelKey::Language), Style::PLAIN);
    put(raster, " ", Style::PLAIN);
    for (i, lang) in Language::ALL.into_iter().enumerate() {
        if i > 0 {
            put(raster, " · ", Style::PLAIN.dim());
        }
        let style = if lang == labels.language() {
            accent
        } else {
            Style::PLAIN.dim()
        };
        put(raster, lang.code(), style);
    }

    raster.put_str(0, top + 1, &status_line(scene.sim), Style::PLAIN);
    raster.put_str(
        0,
        top + 2,
        "⏎/s start · r reset · l language · q quit",
        Style::PLAIN.dim(),
    );
}

/// Phase, elapsed time, distance fallen and acceleration on one line.
#[must_use]
pub fn status_line(sim: &Simulation) -> String {
    let phase = match sim.phase() {
        Phase::Idle => "○ idle",
        Phase::Running => "▶ falling",
        Phase::Stopped => "■ landed",
    };
    let ball = sim.ball();
    format!(
        "{phase}   t = {:.2} s   h = {:.1} m   g = {} m/s²",
        ball.time,
        sim.fallen_meters(),
        ball.gravity.value()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ShadowPolicy;
    use crate::viewport::Canvas;
    use kinematics::Gravity;

    fn sim() -> Simulation {
        // 40 × 36 cells of canvas at the default cell size.
        Simulation::new(
            Canvas::new(160.0, 288.0),
            Scale::default(),
            ShadowPolicy::OnePerFrame,
        )
    }

    fn scene<'a>(sim: &'a Simulation, labels: &'a Labels) -> Scene<'a> {
        Scene {
            sim,
            labels,
            gravity_input: "9.8",
            notice: false,
        }
    }

    #[test]
    fn raster_clips_out_of_bounds() {
        let mut r = Raster::new(3, 2);
        r.set(-1, 0, 'x', Style::PLAIN);
        r.set(3, 0, 'x', Style::PLAIN);
        r.set(0, 2, 'x', Style::PLAIN);
        r.put_str(1, 1, "abcdef", Style::PLAIN);
        assert_eq!(r.to_plain(), "\n ab");
    }

    #[test]
    fn plain_and_ansi_agree_without_style() {
        let mut r = Raster::new(5, 1);
        r.put_str(0, 0, "hi", Style::PLAIN);
        assert_eq!(r.to_plain(), "hi");
        assert_eq!(r.to_ansi(), "hi");
    }

    #[test]
    fn ansi_contains_escape_for_colored_cells() {
        let mut r = Raster::new(5, 1);
        r.put_str(0, 0, "go", Style::fg(Color::Green));
        let ansi = r.to_ansi();
        assert!(ansi.contains('\u{1b}'));
        assert!(ansi.contains("go"));
    }

    #[test]
    fn idle_frame_has_title_ball_ground_and_panel() {
        let s = sim();
        let labels = Labels::new(Language::En);
        let r = render(&scene(&s, &labels), 80, 40, CellSize::default());

        assert!(r.row_text(1).contains("Physics in Action"));
        // Ball centered at x = 80 px -> columns 18..=21, y = 36.8 px -> rows 3..=5.
        assert_eq!(r.get(20, 4).map(|c| c.ch), Some(BALL_GLYPH));
        // Ground from y = 280 px -> row 35.
        assert_eq!(
            r.get(0, 35),
            Some(Cell {
                ch: GROUND_GLYPH,
                style: Style::fg(Color::Green)
            })
        );
        assert!(r.row_text(36).starts_with("Gravity (m/s²): [9.8"));
        assert!(r.row_text(37).starts_with("○ idle"));
    }

    #[test]
    fn shadows_are_labelled() {
        let mut s = sim();
        s.start(Gravity::EARTH, 0.0);
        s.step(1.0);
        let labels = Labels::default();
        let text = render(&scene(&s, &labels), 80, 40, CellSize::default()).to_plain();
        assert!(text.contains("0s, 0.0m"));
        assert!(text.contains("1s, 4.9m"));
    }

    #[test]
    fn language_changes_only_text() {
        let s = sim();
        let en = Labels::new(Language::En);
        let ru = Labels::new(Language::Ru);
        let a = render(&scene(&s, &en), 80, 40, CellSize::default());
        let b = render(&scene(&s, &ru), 80, 40, CellSize::default());
        assert!(b.row_text(1).contains("Свободное падение"));
        assert_eq!(a.get(20, 4), b.get(20, 4));
        assert_eq!(a.row_text(35), b.row_text(35));
    }

    #[test]
    fn notice_overlays_canvas() {
        let s = sim();
        let labels = Labels::default();
        let mut sc = scene(&s, &labels);
        sc.notice = true;
        let text = render(&sc, 80, 40, CellSize::default()).to_plain();
        assert!(text.contains("[ OK ]"));
        assert!(text.contains("Please enter a valid"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let s = sim();
        let labels = Labels::default();
        let r = render(&scene(&s, &labels), 3, 2, CellSize::default());
        assert_eq!(r.rows(), 2);
        let r = render(&scene(&s, &labels), 0, 0, CellSize::default());
        assert_eq!(r.to_plain(), "");
    }

    #[test]
    fn status_line_reports_phase() {
        let mut s = sim();
        assert!(status_line(&s).starts_with("○ idle"));
        s.start(Gravity::EARTH, 0.0);
        s.step(0.5);
        assert!(status_line(&s).starts_with("▶ falling"));
        assert!(status_line(&s).contains("t = 0.50 s"));
    }
}
