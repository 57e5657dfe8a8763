use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Position;

/// Rejected configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite value greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be within (0, 1], got {value}")]
    FrictionOutOfRange { name: &'static str, value: f32 },
    #[error("boid speed range is inverted: min {min} > max {max}")]
    InvertedSpeedRange { min: u32, max: u32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f32 },
    #[error("agent {index} in the boid list is not a boid")]
    NotABoid { index: usize },
    #[error("the player slot holds a boid")]
    NotAPlayer,
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    EmptyGrid { columns: usize, rows: usize },
}

/// Every tunable of the flocking simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: f32,
    pub height: f32,
    pub boid_count: usize,
    pub fps: u32,
    pub alignment_radius: f32,
    pub separation_radius: f32,
    pub cohesion_radius: f32,
    pub max_force: f32,
    pub boid_friction: f32,
    /// Boid speeds are drawn as whole numbers from this inclusive range
    pub boid_speed_min: u32,
    pub boid_speed_max: u32,
    pub boid_size: f32,
    pub player_speed: f32,
    pub player_friction: f32,
    pub player_size: f32,
    pub player_start: Position,
    pub wander_distance: f32,
    pub wander_radius: f32,
    /// Upper bound of the per-tick wander angle change, in radians
    pub wander_drift: f32,
    pub slowing_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            boid_count: 100,
            fps: 60,
            alignment_radius: 40.0,
            separation_radius: 40.0,
            cohesion_radius: 80.0,
            max_force: 0.3,
            boid_friction: 0.75,
            boid_speed_min: 2,
            boid_speed_max: 3,
            boid_size: 20.0,
            player_speed: 0.5,
            player_friction: 0.9,
            player_size: 30.0,
            player_start: Position::new(400.0, 300.0),
            wander_distance: 80.0,
            wander_radius: 30.0,
            wander_drift: 1.0 / 16.0,
            slowing_radius: 100.0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("fps", self.fps as f32)?;
        positive("alignment_radius", self.alignment_radius)?;
        positive("separation_radius", self.separation_radius)?;
        positive("cohesion_radius", self.cohesion_radius)?;
        positive("max_force", self.max_force)?;
        positive("boid_speed_min", self.boid_speed_min as f32)?;
        positive("boid_size", self.boid_size)?;
        positive("player_speed", self.player_speed)?;
        positive("player_size", self.player_size)?;
        positive("slowing_radius", self.slowing_radius)?;
        friction("boid_friction", self.boid_friction)?;
        friction("player_friction", self.player_friction)?;
        non_negative("wander_distance", self.wander_distance)?;
        non_negative("wander_radius", self.wander_radius)?;
        non_negative("wander_drift", self.wander_drift)?;

        if self.boid_speed_min > self.boid_speed_max {
            return Err(ConfigError::InvertedSpeedRange {
                min: self.boid_speed_min,
                max: self.boid_speed_max,
            });
        }
        Ok(())
    }
}

/// Game of Life board settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LifeConfig {
    pub columns: usize,
    pub rows: usize,
    pub fps: u32,
    /// Chance that a cell starts alive
    pub density: f32,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            columns: 100,
            rows: 100,
            fps: 20,
            density: 0.5,
        }
    }
}

impl LifeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        positive("fps", self.fps as f32)?;
        if !(0.0..=1.0).contains(&self.density) {
            return Err(ConfigError::ProbabilityOutOfRange {
                name: "density",
                value: self.density,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn friction(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::FrictionOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
        assert_eq!(LifeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "boid_count": 12, "width": 320.0 }"#).unwrap();
        assert_eq!(config.boid_count, 12);
        assert_eq!(config.width, 320.0);
        assert_eq!(config.cohesion_radius, 80.0);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let config = SimulationConfig {
            boid_friction: 1.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FrictionOutOfRange {
                name: "boid_friction",
                value: 1.5
            })
        );
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let config = SimulationConfig {
            boid_speed_min: 4,
            boid_speed_max: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedSpeedRange { min: 4, max: 3 })
        ));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = LifeConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
