//! # Game Configuration
//!
//! Loaded once at start-up from TOML. Every field is optional; missing
//! fields take their default.
//!
//! ```toml
//! window_width = 1280
//! window_height = 720
//! map_width = 1600
//! map_height = 1280
//! target_fps = 60
//! debug_colliders = false
//! player_speed = 90.0
//! fire_key = "Space"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::Key;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`GameConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Start-up settings of a [`crate::Game`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport width in pixels.
    pub window_width: i32,
    /// Viewport height in pixels.
    pub window_height: i32,
    /// World width in pixels; the camera never leaves it.
    pub map_width: i32,
    /// World height in pixels.
    pub map_height: i32,
    /// Frames per second the fixed step is derived from.
    pub target_fps: u32,
    /// Start with collider outlines visible.
    pub debug_colliders: bool,
    /// Player speed in pixels per second.
    pub player_speed: f64,
    /// Key name that makes keyboard-controlled entities shoot.
    pub fire_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            map_width: 1600,
            map_height: 1280,
            target_fps: 60,
            debug_colliders: false,
            player_speed: 90.0,
            fire_key: "Space".to_owned(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(ConfigError::Invalid("window size must be positive".into()));
        }
        if self.map_width <= 0 || self.map_height <= 0 {
            return Err(ConfigError::Invalid("map size must be positive".into()));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be at least 1".into()));
        }
        if !self.player_speed.is_finite() || self.player_speed < 0.0 {
            return Err(ConfigError::Invalid("player_speed must be a non-negative number".into()));
        }
        self.fire_key()?;
        Ok(())
    }

    /// The parsed fire key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the key name is unknown.
    pub fn fire_key(&self) -> ConfigResult<Key> {
        self.fire_key
            .parse()
            .map_err(|err| ConfigError::Invalid(format!("fire_key: {err}")))
    }

    /// Milliseconds per frame at the target rate.
    #[must_use]
    pub fn frame_budget_ms(&self) -> u64 {
        1000 / u64::from(self.target_fps.max(1))
    }
}
