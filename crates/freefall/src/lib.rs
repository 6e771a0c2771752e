#![forbid(unsafe_code)]

//! # Freefall
//!
//! Terminal visualization of a ball falling under configurable gravity.
//!
//! A ball is released near the top of a pixel-space canvas and falls toward
//! a ground strip. Every whole second of flight leaves a translucent
//! "shadow" annotated with the elapsed time and the distance fallen. The
//! on-screen labels can be switched live between English, Kazakh and
//! Russian.
//!
//! ## Public Modules
//!
//! - [`sim`] - Ball state, run phases and the per-frame stepper
//! - [`scheduler`] - Clocks, frame requests and the headless frame driver
//! - [`i18n`] - Languages and the label map
//! - [`viewport`] - Canvas sizing from the host window
//! - [`render`] - Scene rasterisation into terminal cells
//! - [`app`] - The interactive model (Elm architecture)
//! - [`program`] - Terminal setup and the event loop
//! - [`simulator`] - Drive a model without a terminal (tests, CI)
//! - [`headless`] - The `simulate` subcommand
//! - [`config`], [`cli`], [`logging`] - Ambient plumbing

pub mod app;
pub mod ball;
pub mod cli;
pub mod config;
pub mod error;
pub mod headless;
pub mod i18n;
pub mod logging;
pub mod messages;
pub mod program;
pub mod render;
pub mod scheduler;
pub mod sim;
pub mod simulator;
pub mod viewport;

pub use app::App;
pub use error::{SimError, SimResult};
pub use i18n::{LabelKey, Labels, Language};
pub use messages::{Cmd, Key, Msg};
pub use program::{Model, Program, ProgramError};
pub use sim::{Phase, ShadowPolicy, Simulation, StepOutcome};
