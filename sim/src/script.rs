//! Time-based scripted input for headless runs.

use kinematic::{LocomotionInput, Vec2};
use serde::Deserialize;

/// Hold `direction` over `[from_secs, until_secs)`. With `jump`, the jump button
/// is pressed at `from_secs` and released at `until_secs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputSegment {
    pub from_secs: f32,
    pub until_secs: f32,
    #[serde(default = "Vec2::zeros")]
    pub direction: Vec2,
    #[serde(default)]
    pub jump: bool,
}

impl InputSegment {
    pub fn new(from_secs: f32, until_secs: f32, direction: Vec2) -> Self {
        Self {
            from_secs,
            until_secs,
            direction,
            jump: false,
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}

/// Samples a list of [`InputSegment`]s at fixed steps.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    segments: Vec<InputSegment>,
}

impl InputScript {
    pub fn new(segments: Vec<InputSegment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Input for fixed step `step`, covering `[step * dt, (step + 1) * dt)`.
    ///
    /// Directions of overlapping segments are summed and clamped per axis.
    pub fn sample(&self, step: u64, dt: f32) -> LocomotionInput {
        let start = step as f32 * dt;
        let end = (step + 1) as f32 * dt;
        let in_step = |t: f32| start <= t && t < end;

        let mut input = LocomotionInput::default();
        for segment in &self.segments {
            if segment.from_secs <= start && start < segment.until_secs {
                input.direction += segment.direction;
            }
            if segment.jump {
                input.jump_pressed |= in_step(segment.from_secs);
                input.jump_released |= in_step(segment.until_secs);
            }
        }
        input.direction = Vec2::new(
            input.direction.x.clamp(-1.0, 1.0),
            input.direction.y.clamp(-1.0, 1.0),
        );
        input
    }
}
