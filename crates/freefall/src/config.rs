//! Runtime configuration for `freefall`.
//!
//! [`Config`] is the single source of truth for runtime options, independent
//! of how they were specified. Resolution order, later wins:
//!
//! 1. built-in defaults
//! 2. a TOML file passed with `--config` (or `FREEFALL_CONFIG`)
//! 3. command-line flags and their environment variables
//!
//! # Example file
//!
//! ```toml
//! gravity = 1.62
//! language = "kk"
//! fps = 30
//! shadow_policy = "catch-up"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::AppConfig;
use crate::cli::Cli;
use crate::i18n::Language;
use crate::render::CellSize;
use crate::sim::ShadowPolicy;
use crate::viewport::MAX_CANVAS;

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color unless `NO_COLOR` is set.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Initial acceleration shown in the input, in m/s².
    pub gravity: f64,
    /// Initial display language.
    pub language: Language,
    /// Target frames per second (1-120).
    pub fps: u32,
    /// Whether to use alternate screen mode.
    pub alt_screen: bool,
    /// Color output mode.
    pub color_mode: ColorMode,
    /// Pixels per terminal column.
    pub cell_width: f64,
    /// Pixels per terminal row.
    pub cell_height: f64,
    /// Largest canvas edge in pixels.
    pub max_canvas: f64,
    /// What to do when a frame skips whole seconds.
    pub shadow_policy: ShadowPolicy,
    /// Where to write logs while the TUI owns the terminal.
    pub log_file: Option<PathBuf>,
    /// Log verbosity level (0=warn, 1=info, 2=debug, 3+=trace).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        let cell = CellSize::default();
        Self {
            gravity: kinematics::EARTH_GRAVITY,
            language: Language::En,
            fps: 60,
            alt_screen: true,
            color_mode: ColorMode::Auto,
            cell_width: cell.width,
            cell_height: cell.height,
            max_canvas: MAX_CANVAS,
            shadow_policy: ShadowPolicy::OnePerFrame,
            log_file: None,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Loads a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Resolves the configuration from CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file was given and cannot be
    /// loaded.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(gravity) = cli.gravity {
            config.gravity = gravity;
        }
        if let Some(language) = cli.lang {
            config.language = language;
        }
        if let Some(fps) = cli.fps {
            config.fps = fps;
        }
        if cli.no_alt_screen {
            config.alt_screen = false;
        }
        if cli.force_color {
            config.color_mode = ColorMode::Always;
        } else if cli.no_color {
            config.color_mode = ColorMode::Never;
        }
        if cli.catch_up_shadows {
            config.shadow_policy = ShadowPolicy::CatchUp;
        }
        if let Some(path) = &cli.log_file {
            config.log_file = Some(path.clone());
        }
        config.verbosity = config.verbosity.max(cli.verbose);

        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The gravity value is not checked here: it only seeds the input field
    /// and is validated when a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=120).contains(&self.fps) {
            return Err(ConfigError::Invalid(format!(
                "fps must be between 1 and 120, got {}",
                self.fps
            )));
        }
        for (name, value) in [
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("max_canvas", self.max_canvas),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Check if colors should be used.
    #[must_use]
    pub fn use_color(&self) -> bool {
        match self.color_mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty()),
        }
    }

    /// Pixels per terminal cell.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        CellSize {
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Text that seeds the gravity input.
    #[must_use]
    pub fn gravity_input(&self) -> String {
        self.gravity.to_string()
    }

    /// Settings for the interactive app.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            gravity_input: self.gravity_input(),
            language: self.language,
            cell: self.cell_size(),
            max_canvas: self.max_canvas,
            shadow_policy: self.shadow_policy,
            color: self.use_color(),
        }
    }
}

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
