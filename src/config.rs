//! Configuration loading
//!
//! All sections are optional; a missing file argument means defaults.
//!
//! ```toml
//! [gesture]
//! offset_threshold = 100.0
//! tie_break = "vertical"
//!
//! [pacing]
//! reveal_delay_ms = 150
//!
//! [tiers]
//! out_of = 10
//! tiers = [
//!     { min_score = 9, label = "Top", message = "Flawless instincts." },
//!     { min_score = 0, label = "Rest", message = "Try again." },
//! ]
//! ```

use crate::gesture::GestureConfig;
use crate::session::{PacingConfig, TierTable, TierTableError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tier table: {0}")]
    Tiers(#[from] TierTableError),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Where progress is kept between runs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub state_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            state_dir: PathBuf::from(".case-trainer"),
        }
    }
}

/// Terminal cell geometry used to convert mouse cells into pixels
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub cell_width_px: f32,
    pub cell_height_px: f32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            cell_width_px: 8.0,
            cell_height_px: 16.0,
        }
    }
}

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub tiers: TierTable,
    pub pacing: PacingConfig,
    pub storage: StorageConfig,
    pub terminal: TerminalConfig,
}

impl AppConfig {
    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Validation(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )))
            }
        };

        positive("gesture.offset_threshold", self.gesture.offset_threshold)?;
        positive("gesture.velocity_threshold", self.gesture.velocity_threshold)?;
        positive("gesture.dismiss_threshold", self.gesture.dismiss_threshold)?;
        positive("terminal.cell_width_px", self.terminal.cell_width_px)?;
        positive("terminal.cell_height_px", self.terminal.cell_height_px)?;

        if self.gesture.velocity_window_ms == 0 {
            return Err(ConfigError::Validation(
                "gesture.velocity_window_ms must be positive".to_string(),
            ));
        }

        self.tiers.validate()?;
        Ok(())
    }
}
