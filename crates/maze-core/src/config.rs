//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without
//! recompiling. Every default matches the shipped feel of the game; the file
//! exists so tuning sessions don't need a rebuild.

use bevy_ecs::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration, loaded once and inserted as a resource
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub motion: MotionConfig,
    pub tension: TensionConfig,
    pub capture: CaptureConfig,
}

/// World geometry and stepping
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of one maze cell in world units
    pub cell_size: f32,
    /// Ceiling on per-tick delta time, seconds. Long stalls advance the
    /// simulation by at most this much.
    pub max_tick_dt: f32,
}

/// Agent steering and cadence
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Collision radius for every agent
    pub agent_radius: f32,
    /// Floor under all speed modifiers
    pub min_speed: f32,
    /// Wanderers inside this distance stop and face the player
    pub stare_distance: f32,
    /// Wanderer re-path cadence, seconds
    pub wander_repath_secs: f32,
    /// Bounds on the random delay before a wanderer picks a new goal cell
    pub wander_retarget_min_secs: f32,
    pub wander_retarget_max_secs: f32,
    /// Pursuer speed bonus per point of tension, applied as
    /// `1 + gain * tension / 100`
    pub tension_speed_gain: f32,
}

/// Dread estimator weights
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TensionConfig {
    /// Pursuer distance at which closeness saturates to 1
    pub near_distance: f32,
    /// Pursuer distance at which closeness falls to 0
    pub far_distance: f32,
    pub closeness_weight: f32,
    pub gaze_weight: f32,
    /// Baseline contribution per point of guilt
    pub guilt_weight: f32,
    /// Baseline contribution per point of obsession
    pub obsession_weight: f32,
    /// Low-pass filter rate, 1/seconds
    pub smoothing_rate: f32,
    /// Tension added per second per world unit a staring wanderer is
    /// inside the stare distance
    pub stare_pressure_gain: f32,
}

/// End-of-run trigger
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Pursuer-to-player distance that ends the run
    pub distance: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            motion: MotionConfig::default(),
            tension: TensionConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cell_size: 3.2,
            max_tick_dt: 0.033,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            agent_radius: 0.3,
            min_speed: 0.1,
            stare_distance: 3.4,
            wander_repath_secs: 0.45,
            wander_retarget_min_secs: 2.0,
            wander_retarget_max_secs: 5.0,
            tension_speed_gain: 0.06,
        }
    }
}

impl Default for TensionConfig {
    fn default() -> Self {
        Self {
            near_distance: 2.8,
            far_distance: 10.0,
            closeness_weight: 0.9,
            gaze_weight: 0.35,
            guilt_weight: 0.25,
            obsession_weight: 0.18,
            smoothing_rate: 0.9,
            stare_pressure_gain: 0.6,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { distance: 1.25 }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from the default path, or fall back to the built-in defaults
    pub fn load_or_default() -> Self {
        match Self::load(DEFAULT_TUNING_PATH) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("could not load {}: {}; using defaults", DEFAULT_TUNING_PATH, e);
                Self::default()
            }
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.world.cell_size, 3.2);
        assert_eq!(config.capture.distance, 1.25);
        assert!(config.tension.far_distance > config.tension.near_distance);
        assert!(config.motion.wander_retarget_max_secs > config.motion.wander_retarget_min_secs);
    }

    #[test]
    fn test_partial_toml_fills_with_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            [capture]
            distance = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.capture.distance, 2.0);
        assert_eq!(config.world.cell_size, 3.2);
    }

    #[test]
    fn test_load_config_file() {
        // Exercises the shipped tuning.toml when running from the workspace
        if Path::new(DEFAULT_TUNING_PATH).exists() {
            let config = SimConfig::load(DEFAULT_TUNING_PATH).unwrap();
            assert!(config.world.cell_size > 0.0);
        }
    }
}
