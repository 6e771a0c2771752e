#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]

//! # Kinematics
//!
//! Closed-form free-fall motion for 2D visualizations.
//!
//! Positions live in pixel space with the origin at the top-left corner and
//! y growing downward, the way terminals and canvases lay out their cells.
//! Physical quantities (meters, seconds, m/s²) are converted to pixels with
//! a fixed [`Scale`].
//!
//! Nothing here integrates numerically: every position is an exact
//! evaluation of `½·g·t²`, so the result only depends on `t` and `g`.
//!
//! ## Example
//!
//! ```rust
//! use kinematics::{FreeFall, Gravity, Point, Scale};
//!
//! let fall = FreeFall::new(
//!     Point::new(100.0, 20.0),
//!     Gravity::new(9.8).unwrap(),
//!     Scale::default(),
//! );
//!
//! // After one second a ball has dropped 4.9 m, i.e. 39.2 px at 8 px/m.
//! let p = fall.position_at(1.0);
//! assert!((p.y - 59.2).abs() < 1e-9);
//! ```

mod freefall;

pub use freefall::{
    EARTH_GRAVITY, FreeFall, Gravity, InvalidGravity, PIXELS_PER_METER, Point, Scale, Vector,
    displacement, fps,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::freefall::{FreeFall, Gravity, Point, Scale, Vector, displacement, fps};
}
