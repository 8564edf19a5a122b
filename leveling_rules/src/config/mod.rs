//! Leveling configuration: tunable constants for the curve and the award formulas.
//!
//! The configuration is loaded once by the host (TOML or JSON), validated, and
//! then shared through a [`SharedConfig`] handle. Changes made through the
//! handle apply to the next computation; stored records are not recomputed.

mod shared;

pub use shared::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Largest accepted `max_level`. Curve sums are linear in the level.
pub const MAX_LEVEL_LIMIT: u32 = 10_000;

/// Tunable constants of the progression system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelingConfig {
    /// Highest reachable level.
    pub max_level: u32,

    /// Experience needed for the first level.
    pub base_exp_per_level: f64,

    /// Ratio between the cost of consecutive levels.
    pub growth_factor: f64,

    /// Experience per victim level.
    pub base_exp_multiplier: f64,

    /// Applied once to the shared pool when more than one player takes part.
    pub group_multiplier: f64,

    /// Applied to boss (V Blood) kills.
    pub vblood_multiplier: f64,

    /// Applied to ordinary unit kills.
    pub unit_multiplier: f64,

    /// Decay rate of the penalty for killing lower-level victims.
    pub level_scaling_factor: f64,

    // Display hints for the host UI
    pub show_level_up_effects: bool,
    pub show_experience_log: bool,
    pub show_scrolling_combat_text: bool,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            max_level: 100,
            base_exp_per_level: 100.0,
            growth_factor: 1.1,
            base_exp_multiplier: 1.0,
            group_multiplier: 1.2,
            vblood_multiplier: 5.0,
            unit_multiplier: 1.0,
            level_scaling_factor: 0.1,
            show_level_up_effects: true,
            show_experience_log: true,
            show_scrolling_combat_text: true,
        }
    }
}

impl LevelingConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&source)?,
            Some("json") => Self::from_json_str(&source)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        tracing::info!(path = %path.display(), max_level = config.max_level, "loaded leveling config");
        Ok(config)
    }

    /// Check that every numeric option is usable by the curve and the formulas.
    pub fn validate(&self) -> Result<()> {
        if self.max_level > MAX_LEVEL_LIMIT {
            return Err(invalid(
                "max_level",
                format!("must be at most {MAX_LEVEL_LIMIT}, got {}", self.max_level),
            ));
        }

        let positive = [
            ("base_exp_per_level", self.base_exp_per_level),
            ("growth_factor", self.growth_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("must be a finite positive number, got {value}")));
            }
        }

        let non_negative = [
            ("base_exp_multiplier", self.base_exp_multiplier),
            ("group_multiplier", self.group_multiplier),
            ("vblood_multiplier", self.vblood_multiplier),
            ("unit_multiplier", self.unit_multiplier),
            ("level_scaling_factor", self.level_scaling_factor),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, format!("must be finite and non-negative, got {value}")));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
