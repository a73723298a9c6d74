//! Headless fixed-step scene driving [`kinematic`] movers: one scripted player,
//! a static rapier level, and moving platforms that carry their riders.

pub mod config;
pub mod error;
pub mod level;
pub mod scene;
pub mod script;
pub mod simulation;

pub use config::{PlatformConfig, PlayerConfig, SimConfig};
pub use error::SimError;
pub use scene::{BodyBox, PLATFORM_LAYER, PLAYER_LAYER, STATIC_LAYER, SceneCaster};
pub use script::{InputScript, InputSegment};
pub use simulation::{FIRST_BODY_ID, Platform, Player, Simulation};
