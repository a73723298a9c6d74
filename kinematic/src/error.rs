use thiserror::Error;

/// Construction-time validation failures.
///
/// Every variant is detected before a controller, path, or locomotion model is
/// created. Once built, the per-step operations never fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{axis} ray count must be at least {min}, got {count}")]
    RayCount {
        axis: &'static str,
        count: usize,
        min: usize,
    },

    #[error("body half extents must be finite and positive, got ({x}, {y})")]
    BodySize { x: f32, y: f32 },

    #[error("body of size ({x}, {y}) is too small for a skin width of {skin}")]
    BodyThinnerThanSkin { x: f32, y: f32, skin: f32 },

    #[error("skin width must be finite and positive, got {0}")]
    SkinWidth(f32),

    #[error("{name} must be within [0, 90) degrees, got {value}")]
    SlopeAngle { name: &'static str, value: f32 },

    #[error("pass-through cooldown must be finite and non-negative, got {0}")]
    Cooldown(f32),

    #[error("{name} of {value} seconds does not fit a duration")]
    DurationOutOfRange { name: &'static str, value: f32 },

    #[error("a platform path needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error("waypoint {index} is not finite")]
    NonFiniteWaypoint { index: usize },

    #[error("waypoints {from} and {to} coincide; segments must have a non-zero length")]
    ZeroLengthSegment { from: usize, to: usize },

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("static collider {id}: {reason}")]
    InvalidCollider { id: u32, reason: &'static str },

    #[error("static collider id {0} is used more than once")]
    DuplicateColliderId(u32),
}
