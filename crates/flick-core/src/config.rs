//! Gameplay tuning, loadable from JSON.

use serde::Deserialize;

use crate::error::ConfigError;

/// Fixed timestep for physics and animation (60Hz).
pub const FIXED_STEP: f32 = 1.0 / 60.0;

/// Tunables shared by the game, its levels and their effects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Seconds per fixed step.
    pub fixed_step: f32,
    /// Upper bound on fixed steps run by a single `update`.
    pub max_substeps: u32,
    /// Impulse per pixel between hero and target. The hero weighs 400 mass units.
    pub shot_power: f32,
    pub max_impulse: f32,
    /// Gravity constant of the attractor force law.
    pub attractor_gravity: f32,
    pub hero_linear_damping: f32,
    pub hero_angular_damping: f32,
    /// Physics steps between two trail samples.
    pub trail_interval: u32,
    pub trail_capacity: usize,
    pub spark_count: usize,
    /// Spark lifetime in ticks.
    pub spark_ttl: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_step: FIXED_STEP,
            max_substeps: 8,
            shot_power: 800.0,
            max_impulse: 200_000.0,
            attractor_gravity: 1.0e6,
            hero_linear_damping: 0.5,
            hero_angular_damping: 1.0,
            trail_interval: 5,
            trail_capacity: 10,
            spark_count: 30,
            spark_ttl: 100,
        }
    }
}

impl GameConfig {
    /// Parses a config document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            return Err(ConfigError::NonPositiveDuration(self.fixed_step));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("maxSubsteps must be at least 1".to_string()));
        }
        if self.trail_interval == 0 {
            return Err(ConfigError::Invalid("trailInterval must be at least 1".to_string()));
        }
        if !(self.shot_power >= 0.0 && self.max_impulse >= 0.0) {
            return Err(ConfigError::Invalid(
                "shotPower and maxImpulse must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
