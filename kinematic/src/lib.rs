pub mod collision;
pub mod constants;
pub mod error;
pub mod locomotion;
pub mod platform;
pub mod rapier_world;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use collision::{
    Bounds, ColliderId, CollisionLayers, CollisionState, Controller, ControllerSettings, Motion,
    MoveRequest, RayCaster, RayFilter, RayHit, Surface, Vec2,
};
pub use constants::{
    DEFAULT_HORIZONTAL_RAY_COUNT, DEFAULT_MAX_CLIMB_ANGLE_DEG, DEFAULT_MAX_DESCEND_ANGLE_DEG,
    DEFAULT_MAX_SLOPE_ANGLE_DEG, DEFAULT_VERTICAL_RAY_COUNT, DROP_THROUGH_INPUT_Y,
    INPUT_DEAD_ZONE, MIN_RAY_COUNT, PASS_THROUGH_COOLDOWN, SKIN_WIDTH, SLOPE_ANGLE_EPS,
};
pub use error::ConfigError;
pub use locomotion::{Locomotion, LocomotionInput, LocomotionSettings};
pub use platform::{
    PassengerMovement, PathSettings, PlatformController, PlatformSettings, TransportPhase,
    WaypointPath,
};
pub use rapier_world::{ColliderShapeDef, StaticWorld, WorldStaticDef};
