//! Tuning parameters for the combat core.
//!
//! Defaults reproduce the authored prototype values. Every field is optional
//! in TOML (`#[serde(default)]`), so a config file only lists overrides:
//!
//! ```toml
//! max_health = 120
//! move_speed = 4.5
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed world lateral axis (screen left/right). Movement and knockback live on it.
pub const LATERAL_AXIS: Vec3 = Vec3::X;

/// Errors surfaced while loading authored data (config, move libraries).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid move '{name}': {reason}")]
    InvalidMove { name: String, reason: String },

    #[error("duplicate move '{0}'")]
    DuplicateMove(String),

    #[error("invalid config value '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Combat/locomotion tuning (resource).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Стартовое (и максимальное) HP бойца
    pub max_health: i32,
    /// Lateral walk speed (m/s)
    pub move_speed: f32,
    /// |move_axis| above this flips Idle → Move
    pub move_deadzone: f32,
    pub jump_velocity: f32,
    /// m/s², negative = down
    pub gravity: f32,
    pub ground_height: f32,
    /// Horizontal deceleration on the ground (m/s²), drains knockback
    pub ground_friction: f32,
    /// Height of hit-volume centers above the fighter origin
    pub hit_volume_height: f32,
    /// Height of the hurt capsule center above the fighter origin
    pub hurt_volume_height: f32,
    pub hurt_volume_half_height: f32,
    pub hurt_volume_radius: f32,
    /// dot(defender.facing, dir_to_attacker) must exceed this to block
    pub guard_facing_threshold: f32,
    /// Share of knockback that survives a block
    pub block_knockback_scale: f32,
    /// FixedUpdate rate used by `SimulationPlugin`
    pub tick_rate_hz: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            move_speed: 5.0,
            move_deadzone: 0.01,
            jump_velocity: 6.5,
            gravity: -9.81,
            ground_height: 0.0,
            ground_friction: 30.0,
            hit_volume_height: 1.0,
            hurt_volume_height: 1.0,
            hurt_volume_half_height: 0.5,
            hurt_volume_radius: 0.4,
            guard_facing_threshold: 0.2,
            block_knockback_scale: 0.3,
            tick_rate_hz: 64.0,
        }
    }
}

impl CombatConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_health",
                reason: format!("must be positive, got {}", self.max_health),
            });
        }
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_hz",
                reason: format!("must be positive, got {}", self.tick_rate_hz),
            });
        }
        if !(0.0..=1.0).contains(&self.block_knockback_scale) {
            return Err(ConfigError::InvalidValue {
                field: "block_knockback_scale",
                reason: format!("must be within [0, 1], got {}", self.block_knockback_scale),
            });
        }
        if self.hurt_volume_radius <= 0.0 || self.hurt_volume_half_height < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "hurt_volume",
                reason: "radius must be positive and half height non-negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CombatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.guard_facing_threshold, 0.2);
        assert_eq!(config.block_knockback_scale, 0.3);
        assert_eq!(config.move_deadzone, 0.01);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CombatConfig::from_toml_str("max_health = 120\nmove_speed = 4.5\n")
            .expect("partial config should parse");

        assert_eq!(config.max_health, 120);
        assert_eq!(config.move_speed, 4.5);
        assert_eq!(config.jump_velocity, CombatConfig::default().jump_velocity);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = CombatConfig::from_toml_str("max_health = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "max_health", .. }));

        let err = CombatConfig::from_toml_str("block_knockback_scale = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = CombatConfig::from_toml_str("max_health = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CombatConfig::load_from_path(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
