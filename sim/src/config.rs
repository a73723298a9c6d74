//! Simulation configuration parsed from TOML.
//!
//! Every field has a default; an empty file runs the built-in demo level.

use std::path::Path;

use kinematic::{
    ControllerSettings, LocomotionSettings, PlatformSettings, Surface, Vec2, WorldStaticDef,
};
use serde::Deserialize;

use crate::{SimError, level, script::InputSegment};

/// Player body and tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: Vec2,
    pub half_extents: Vec2,
    pub controller: ControllerSettings,
    pub locomotion: LocomotionSettings,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: level::player_spawn(),
            half_extents: Vec2::new(0.5, 0.75),
            controller: ControllerSettings {
                collision_mask: level::player_collision_mask(),
                ..ControllerSettings::default()
            },
            locomotion: LocomotionSettings::default(),
        }
    }
}

/// One moving platform.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub position: Vec2,
    pub half_extents: Vec2,
    #[serde(default)]
    pub surface: Surface,
    #[serde(default = "level::platform_settings")]
    pub settings: PlatformSettings,
}

/// Simulation configuration from a `.toml` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed steps per simulated second.
    pub tick_rate: u32,
    /// Simulated seconds to run.
    pub duration_secs: f32,
    pub player: PlayerConfig,
    pub statics: Vec<WorldStaticDef>,
    pub platforms: Vec<PlatformConfig>,
    /// Scripted directional input and jumps for the headless run.
    pub script: Vec<InputSegment>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            duration_secs: 12.0,
            player: PlayerConfig::default(),
            statics: level::demo_statics(),
            platforms: level::demo_platforms(),
            script: level::demo_script(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| SimError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fixed step length in seconds.
    pub fn step_secs(&self) -> Result<f32, SimError> {
        if self.tick_rate == 0 {
            return Err(SimError::TickRate);
        }
        Ok(1.0 / self.tick_rate as f32)
    }

    /// Number of fixed steps covering `duration_secs`.
    pub fn step_count(&self) -> Result<u64, SimError> {
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(SimError::Duration(self.duration_secs));
        }
        if self.tick_rate == 0 {
            return Err(SimError::TickRate);
        }
        Ok((self.duration_secs * self.tick_rate as f32).round() as u64)
    }
}
