use std::time::Duration;

/// Inward shrink applied to a body's bounds before casting rays (world units).
///
/// Rays start this far inside the box so that a body resting exactly on a
/// surface still produces a positive hit distance instead of self-overlapping.
pub const SKIN_WIDTH: f32 = 0.015;

/// Default number of rays fanned along the left/right faces.
pub const DEFAULT_HORIZONTAL_RAY_COUNT: usize = 4;

/// Default number of rays fanned along the top/bottom faces.
pub const DEFAULT_VERTICAL_RAY_COUNT: usize = 4;

/// Minimum ray count per face: one ray at each corner.
pub const MIN_RAY_COUNT: usize = 2;

/// Steepest slope (degrees) a body walks up instead of treating as a wall.
pub const DEFAULT_MAX_CLIMB_ANGLE_DEG: f32 = 80.0;

/// Steepest slope (degrees) a body follows downward without going airborne.
pub const DEFAULT_MAX_DESCEND_ANGLE_DEG: f32 = 80.0;

/// Slope angle (degrees) beyond which a body can no longer stand and slides.
pub const DEFAULT_MAX_SLOPE_ANGLE_DEG: f32 = 80.0;

/// How long a one-way platform stays ignored after a drop-through request.
pub const PASS_THROUGH_COOLDOWN: Duration = Duration::from_millis(500);

/// Vertical input at or below this value requests dropping through a one-way platform.
pub const DROP_THROUGH_INPUT_Y: f32 = -1.0;

/// Two slope angles closer than this (radians) are considered the same slope.
pub const SLOPE_ANGLE_EPS: f32 = 1.0e-5;

/// Directional input magnitudes below this are treated as "no input" on that axis.
pub const INPUT_DEAD_ZONE: f32 = 1.0e-3;
