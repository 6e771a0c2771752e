//! Errors surfaced by the simulation itself.
//!
//! There is exactly one domain failure: the acceleration typed by the user
//! cannot be used. It is reported before any state changes, so the caller
//! can show it and let the user retry.

use kinematics::InvalidGravity;

/// Rejected start request.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// The input did not parse as a number.
    #[error("'{input}' is not a number")]
    NotANumber {
        /// The text as typed.
        input: String,
    },

    /// The number parsed but is zero, negative, NaN or infinite.
    #[error("invalid acceleration: {0}")]
    InvalidAcceleration(#[from] InvalidGravity),
}

/// A specialized [`Result`] type for simulation operations.
pub type SimResult<T> = std::result::Result<T, SimError>;
