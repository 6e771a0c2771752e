//! Free-fall motion from rest under constant acceleration.
//!
//! # Example
//!
//! ```rust
//! use kinematics::{fps, FreeFall, Gravity, Point, Scale};
//!
//! let fall = FreeFall::new(Point::new(0.0, 0.0), Gravity::EARTH, Scale::default());
//!
//! let mut t = 0.0;
//! for _ in 0..60 {
//!     t += fps(60);
//!     let pos = fall.position_at(t);
//!     println!("Position: ({}, {})", pos.x, pos.y);
//! }
//! ```

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub};

/// Pixels drawn for one meter of fall.
pub const PIXELS_PER_METER: f64 = 8.0;

/// Standard gravity at the Earth's surface, as the visualization presents it.
pub const EARTH_GRAVITY: f64 = 9.8;

/// Returns a time delta for a given number of frames per second.
///
/// ```rust
/// use kinematics::fps;
///
/// assert!((fps(60) - 1.0 / 60.0).abs() < f64::EPSILON);
/// ```
#[inline]
pub fn fps(n: u32) -> f64 {
    1.0 / n as f64
}

/// A point in 2D pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// X coordinate (grows rightward).
    pub x: f64,
    /// Y coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin point (0, 0).
    #[inline]
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    #[inline]
    fn add(self, v: Vector) -> Point {
        Point {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }
}

impl AddAssign<Vector> for Point {
    #[inline]
    fn add_assign(&mut self, v: Vector) {
        self.x += v.x;
        self.y += v.y;
    }
}

impl Sub for Point {
    type Output = Vector;

    #[inline]
    fn sub(self, other: Point) -> Vector {
        Vector {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// A displacement in 2D pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vector {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A purely vertical displacement (positive is downward).
    #[inline]
    pub const fn down(dy: f64) -> Self {
        Self { x: 0.0, y: dy }
    }

    /// Returns the zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    #[inline]
    fn mul(self, scalar: f64) -> Vector {
        Vector {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Conversion between meters and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pixels_per_meter: f64,
}

impl Scale {
    /// Creates a scale. Non-positive or non-finite values fall back to
    /// [`PIXELS_PER_METER`].
    #[inline]
    pub fn new(pixels_per_meter: f64) -> Self {
        if pixels_per_meter.is_finite() && pixels_per_meter > 0.0 {
            Self { pixels_per_meter }
        } else {
            Self::default()
        }
    }

    /// Pixels per meter.
    #[inline]
    pub const fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    /// Converts meters to pixels.
    #[inline]
    pub fn to_pixels(&self, meters: f64) -> f64 {
        meters * self.pixels_per_meter
    }

    /// Converts pixels to meters.
    #[inline]
    pub fn to_meters(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_meter
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            pixels_per_meter: PIXELS_PER_METER,
        }
    }
}

/// Rejected acceleration value.
///
/// Carries the offending value so callers can echo it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidGravity(pub f64);

impl fmt::Display for InvalidGravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "acceleration must be a positive finite number, got {}",
            self.0
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidGravity {}

/// A validated gravitational acceleration in m/s².
///
/// Always positive and finite.
///
/// ```rust
/// use kinematics::Gravity;
///
/// assert!(Gravity::new(9.8).is_ok());
/// assert!(Gravity::new(0.0).is_err());
/// assert!(Gravity::new(-5.0).is_err());
/// assert!(Gravity::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Gravity(f64);

impl Gravity {
    /// Earth's surface gravity.
    pub const EARTH: Gravity = Gravity(EARTH_GRAVITY);

    /// Validates an acceleration.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGravity`] if `value` is NaN, infinite, zero or negative.
    #[inline]
    pub fn new(value: f64) -> Result<Self, InvalidGravity> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(InvalidGravity(value))
        }
    }

    /// The acceleration in m/s².
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::EARTH
    }
}

/// Distance fallen from rest after `t` seconds, in pixels.
///
/// `0.5 * g * t² * scale`, evaluated exactly.
///
/// ```rust
/// use kinematics::{displacement, Gravity, Scale};
///
/// let d = displacement(1.0, Gravity::new(9.8).unwrap(), Scale::default());
/// assert!((d - 39.2).abs() < 1e-9);
/// ```
#[inline]
pub fn displacement(t: f64, gravity: Gravity, scale: Scale) -> f64 {
    0.5 * gravity.value() * (t * t) * scale.pixels_per_meter()
}

/// A body released from rest at `origin`.
///
/// The horizontal coordinate never changes; the vertical coordinate follows
/// [`displacement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeFall {
    origin: Point,
    gravity: Gravity,
    scale: Scale,
}

impl FreeFall {
    /// Creates a new fall from `origin`.
    #[inline]
    pub const fn new(origin: Point, gravity: Gravity, scale: Scale) -> Self {
        Self {
            origin,
            gravity,
            scale,
        }
    }

    /// Release point.
    #[inline]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Configured acceleration.
    #[inline]
    pub const fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Configured scale.
    #[inline]
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Distance fallen after `t` seconds, in pixels.
    #[inline]
    pub fn displacement_at(&self, t: f64) -> f64 {
        displacement(t, self.gravity, self.scale)
    }

    /// Position after `t` seconds.
    #[inline]
    pub fn position_at(&self, t: f64) -> Point {
        self.origin + Vector::down(self.displacement_at(t))
    }

    /// Downward speed after `t` seconds, in m/s.
    #[inline]
    pub fn speed_at(&self, t: f64) -> f64 {
        self.gravity.value() * t
    }

    /// Time needed to fall `pixels`, in seconds.
    ///
    /// Negative distances are treated as zero.
    #[cfg(any(feature = "std", feature = "libm"))]
    #[inline]
    pub fn time_to_fall(&self, pixels: f64) -> f64 {
        let meters = self.scale.to_meters(pixels.max(0.0));
        sqrt(2.0 * meters / self.gravity.value())
    }
}

#[cfg(feature = "std")]
#[inline]
fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
#[inline]
fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_point_add_vector() {
        let p = Point::new(1.0, 2.0);
        let result = p + Vector::new(4.0, 5.0);

        assert!(approx_eq(result.x, 5.0));
        assert!(approx_eq(result.y, 7.0));
    }

    #[test]
    fn test_point_sub_point() {
        let v = Point::new(5.0, 7.0) - Point::new(1.0, 2.0);
        assert_eq!(v, Vector::new(4.0, 5.0));
    }

    #[test]
    fn test_vector_down_is_vertical() {
        let v = Vector::down(3.0) * 2.0;
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 6.0));
    }

    #[test]
    fn test_scale_roundtrip_meters() {
        let s = Scale::default();
        assert!(approx_eq(s.to_pixels(1.0), 8.0));
        assert!(approx_eq(s.to_meters(39.2), 4.9));
    }

    #[test]
    fn test_scale_rejects_nonsense() {
        assert_eq!(Scale::new(0.0), Scale::default());
        assert_eq!(Scale::new(-3.0), Scale::default());
        assert_eq!(Scale::new(f64::INFINITY), Scale::default());
        assert!(approx_eq(Scale::new(16.0).pixels_per_meter(), 16.0));
    }

    #[test]
    fn test_gravity_validation() {
        assert!(Gravity::new(9.8).is_ok());
        assert!(Gravity::new(1e-9).is_ok());
        assert_eq!(Gravity::new(0.0), Err(InvalidGravity(0.0)));
        assert_eq!(Gravity::new(-5.0), Err(InvalidGravity(-5.0)));
        assert!(Gravity::new(f64::NAN).is_err());
        assert!(Gravity::new(f64::INFINITY).is_err());
        assert!(Gravity::new(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_invalid_gravity_display() {
        let msg = InvalidGravity(-5.0).to_string();
        assert!(msg.contains("positive finite"));
        assert!(msg.contains("-5"));
    }

    #[test]
    fn test_displacement_one_second_earth() {
        let d = displacement(1.0, Gravity::new(9.8).unwrap(), Scale::default());
        assert!(approx_eq(d, 39.2), "got {d}");
    }

    #[test]
    fn test_displacement_zero_time() {
        assert!(approx_eq(
            displacement(0.0, Gravity::EARTH, Scale::default()),
            0.0
        ));
    }

    #[test]
    fn test_position_keeps_x() {
        let fall = FreeFall::new(Point::new(50.0, 10.0), Gravity::EARTH, Scale::default());
        let p = fall.position_at(2.0);
        assert!(approx_eq(p.x, 50.0));
        // 0.5 * 9.8 * 4 * 8 = 156.8
        assert!(approx_eq(p.y, 166.8));
    }

    #[test]
    fn test_speed_at() {
        let fall = FreeFall::new(Point::origin(), Gravity::EARTH, Scale::default());
        assert!(approx_eq(fall.speed_at(2.0), 19.6));
    }

    #[test]
    fn test_time_to_fall_inverts_displacement() {
        let fall = FreeFall::new(Point::origin(), Gravity::EARTH, Scale::default());
        let t = fall.time_to_fall(fall.displacement_at(1.5));
        assert!(approx_eq(t, 1.5), "got {t}");
        assert!(approx_eq(fall.time_to_fall(-10.0), 0.0));
    }
}
