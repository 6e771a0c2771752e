//! The falling ball and its per-second shadows.

use crossterm::style::Color;
use kinematics::{Gravity, Point, Scale};

/// A recorded past position at a whole-second mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Where the ball was, in pixels.
    pub position: Point,
    /// Whole second this shadow marks.
    pub second: u32,
    /// Distance fallen at that second, in pixels.
    pub distance: f64,
}

impl Shadow {
    /// The zero-time entry at the release point.
    #[must_use]
    pub const fn origin(position: Point) -> Self {
        Self {
            position,
            second: 0,
            distance: 0.0,
        }
    }

    /// Annotation drawn next to the marker, e.g. `"2s, 19.6m"`.
    #[must_use]
    pub fn label(&self, scale: Scale) -> String {
        format!("{}s, {:.1}m", self.second, scale.to_meters(self.distance))
    }
}

/// The ball's kinematic state.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Center, in pixels.
    pub position: Point,
    /// Radius in pixels (one meter at the current scale).
    pub radius: f64,
    /// Fill color.
    pub color: Color,
    /// Elapsed simulation time in seconds.
    pub time: f64,
    /// Acceleration used by the current or next run.
    pub gravity: Gravity,
    /// Shadows of the current run, oldest first.
    pub shadows: Vec<Shadow>,
}

impl Ball {
    /// A ball of one meter radius resting at `position`.
    #[must_use]
    pub fn new(position: Point, scale: Scale) -> Self {
        Self {
            position,
            radius: scale.to_pixels(1.0),
            color: Color::Blue,
            time: 0.0,
            gravity: Gravity::EARTH,
            shadows: vec![Shadow::origin(position)],
        }
    }

    /// Bottom edge, in pixels.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.position.y + self.radius
    }
}
