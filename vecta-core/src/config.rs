//! Scene Configuration
//!
//! Options for building the unit circle scene. Every field has a default, so
//! a JSON document only needs the fields it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted `grid_extent`.
pub const MAX_GRID_EXTENT: i32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Side of the square circle panel, in pixels.
    pub width: f64,

    /// Initial angle, in radians.
    pub angle: f64,

    /// Radians added to the angle on every animation frame.
    pub animation_step: f64,

    /// Time between animation frames.
    pub frame_period_ms: u64,

    /// Pointer hit radius for draggable controls, in local units.
    pub hit_radius: f64,

    /// The background grid spans `-grid_extent..=grid_extent` cells.
    pub grid_extent: i32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            angle: 1.0,
            animation_step: 0.01,
            frame_period_ms: 16,
            hit_radius: 10.0,
            grid_extent: 3,
        }
    }
}

impl SceneConfig {
    /// Parse configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !self.angle.is_finite() {
            return Err(ConfigError::Invalid("angle must be finite".into()));
        }
        if !(self.animation_step.is_finite() && self.animation_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation_step must be positive, got {}",
                self.animation_step
            )));
        }
        if self.frame_period_ms == 0 {
            return Err(ConfigError::Invalid("frame_period_ms must be non-zero".into()));
        }
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return Err(ConfigError::Invalid("hit_radius must be positive".into()));
        }
        if !(0..=MAX_GRID_EXTENT).contains(&self.grid_extent) {
            return Err(ConfigError::Invalid(format!(
                "grid_extent must be between 0 and {MAX_GRID_EXTENT}, got {}",
                self.grid_extent
            )));
        }
        Ok(())
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }
}
