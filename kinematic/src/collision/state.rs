use std::time::Duration;

use super::types::Vec2;

/// Per-body record of what the last resolution touched.
///
/// Owned and written only by the body's [`Controller`](super::Controller);
/// everyone else gets it by shared reference or as a copy inside
/// [`Motion`](super::Motion).
///
/// Lifetime of the fields:
/// - contact flags and the climb/descend/slide flags are cleared at the start
///   of every step and set by ray hits during it
/// - `slope_angle` is rolled into `slope_angle_previous` at the start of every step
/// - `face_direction` and the pass-through latch persist across steps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionState {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,

    pub climbing_slope: bool,
    pub descending_slope: bool,
    pub sliding_down_max_slope: bool,

    /// Angle (radians) of the engaged slope. Only meaningful while climbing,
    /// descending, or sliding.
    pub slope_angle: f32,
    /// `slope_angle` from the previous step.
    pub slope_angle_previous: f32,
    /// Normal of the engaged slope, zero when no slope is engaged.
    pub slope_normal: Vec2,

    /// Sign (`-1` or `1`) of the last non-zero horizontal displacement.
    pub face_direction: i8,

    /// True while one-way platforms are being ignored after a drop request.
    pub falling_through_platform: bool,
    pub(crate) falling_through_until: Option<Duration>,

    /// Requested displacement before any slope correction this step.
    pub previous_displacement: Vec2,
}

impl Default for CollisionState {
    fn default() -> Self {
        Self {
            above: false,
            below: false,
            left: false,
            right: false,
            climbing_slope: false,
            descending_slope: false,
            sliding_down_max_slope: false,
            slope_angle: 0.0,
            slope_angle_previous: 0.0,
            slope_normal: Vec2::zeros(),
            face_direction: 1,
            falling_through_platform: false,
            falling_through_until: None,
            previous_displacement: Vec2::zeros(),
        }
    }
}

impl CollisionState {
    /// Clear the per-step fields and snapshot the requested displacement.
    pub(crate) fn begin_step(&mut self, displacement: Vec2) {
        self.above = false;
        self.below = false;
        self.left = false;
        self.right = false;
        self.climbing_slope = false;
        self.descending_slope = false;
        self.sliding_down_max_slope = false;
        self.slope_normal = Vec2::zeros();

        self.slope_angle_previous = self.slope_angle;
        self.slope_angle = 0.0;

        self.previous_displacement = displacement;
    }

    /// Point `face_direction` along `displacement_x` unless it is zero.
    #[inline]
    pub(crate) fn face_toward(&mut self, displacement_x: f32) {
        if displacement_x != 0.0 {
            self.face_direction = if displacement_x < 0.0 { -1 } else { 1 };
        }
    }

    /// Release the pass-through latch once its deadline has passed.
    pub(crate) fn poll_pass_through(&mut self, now: Duration) {
        if self.falling_through_until.is_some_and(|until| now >= until) {
            self.falling_through_until = None;
            self.falling_through_platform = false;
        }
    }

    pub(crate) fn arm_pass_through(&mut self, now: Duration, cooldown: Duration) {
        self.falling_through_platform = true;
        self.falling_through_until = Some(now.saturating_add(cooldown));
    }

    /// Earliest time at which one-way platforms collide again, if latched.
    #[inline]
    pub fn pass_through_until(&self) -> Option<Duration> {
        self.falling_through_until
    }

    #[inline]
    pub fn face_sign(&self) -> f32 {
        f32::from(self.face_direction)
    }

    /// Side of the wall being touched: `-1` left, `1` right.
    #[inline]
    pub fn wall_direction(&self) -> Option<i8> {
        if self.left {
            Some(-1)
        } else if self.right {
            Some(1)
        } else {
            None
        }
    }

    /// On something walkable this step (floor, slope, or a carrying platform).
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.below && !self.sliding_down_max_slope
    }
}
