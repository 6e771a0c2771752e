//! Canvas sizing.
//!
//! The canvas takes 80% of the host width and 90% of the host height, each
//! capped at a maximum. The ball starts 10% down from the top.

/// Largest canvas edge, in pixels.
pub const MAX_CANVAS: f64 = 1500.0;

const WIDTH_FRACTION: f64 = 0.8;
const HEIGHT_FRACTION: f64 = 0.9;
const TOP_MARGIN_FRACTION: f64 = 0.1;

/// Drawing surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    width: f64,
    height: f64,
}

impl Canvas {
    /// A canvas of exactly `width` × `height` pixels (negative values clamp to zero).
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Fits a canvas into a host window of `host_width` × `host_height` pixels.
    #[must_use]
    pub fn fit(host_width: f64, host_height: f64, max: f64) -> Self {
        Self::new(
            (host_width * WIDTH_FRACTION).min(max),
            (host_height * HEIGHT_FRACTION).min(max),
        )
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Vertical coordinate of the ground line for a ball of `radius`.
    #[must_use]
    pub fn ground(&self, radius: f64) -> f64 {
        self.height - radius
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Release height for a ball of `radius`.
    #[must_use]
    pub fn start_y(&self, radius: f64) -> f64 {
        self.height * TOP_MARGIN_FRACTION + radius
    }
}
