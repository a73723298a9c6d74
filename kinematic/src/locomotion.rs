/*!
Player locomotion: turns directional input and jump button edges into the
per-step displacement handed to the [`Controller`](crate::Controller).

Jump physics are authored as heights and time-to-apex and converted once:

- gravity           = -2 * max_jump_height / time_to_jump_apex²
- max jump velocity = |gravity| * time_to_jump_apex
- min jump velocity = sqrt(2 * |gravity| * min_jump_height)

The model reads the controller's [`CollisionState`] twice per step: before
the move (grounded acceleration, wall sliding, jumps) and after it
([`Locomotion::land`]) to cancel vertical velocity on contact.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    CollisionState, ConfigError, Vec2,
    utils::{axis_sign, sign, smooth_damp},
};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LocomotionSettings {
    pub max_jump_height: f32,
    pub min_jump_height: f32,
    pub time_to_jump_apex_secs: f32,
    pub move_speed: f32,

    /// Horizontal smoothing time in the air and on the ground.
    pub acceleration_time_airborne: f32,
    pub acceleration_time_grounded: f32,

    pub wall_slide_speed_max: f32,
    /// Seconds input must point away from a wall before letting go of it.
    pub wall_stick_time_secs: f32,

    /// Wall-jump velocities, x pointing away from the wall.
    pub wall_jump_climb: Vec2,
    pub wall_jump_off: Vec2,
    pub wall_leap: Vec2,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            max_jump_height: 4.0,
            min_jump_height: 1.0,
            time_to_jump_apex_secs: 0.4,
            move_speed: 6.0,
            acceleration_time_airborne: 0.2,
            acceleration_time_grounded: 0.1,
            wall_slide_speed_max: 3.0,
            wall_stick_time_secs: 0.25,
            wall_jump_climb: Vec2::new(7.5, 16.0),
            wall_jump_off: Vec2::new(8.5, 7.0),
            wall_leap: Vec2::new(18.0, 17.0),
        }
    }
}

impl LocomotionSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_jump_height", self.max_jump_height),
            ("min_jump_height", self.min_jump_height),
            ("time_to_jump_apex_secs", self.time_to_jump_apex_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        for (name, value) in [
            ("move_speed", self.move_speed),
            ("acceleration_time_airborne", self.acceleration_time_airborne),
            ("acceleration_time_grounded", self.acceleration_time_grounded),
            ("wall_slide_speed_max", self.wall_slide_speed_max),
            ("wall_stick_time_secs", self.wall_stick_time_secs),
            ("wall_jump_climb.x", self.wall_jump_climb.x),
            ("wall_jump_climb.y", self.wall_jump_climb.y),
            ("wall_jump_off.x", self.wall_jump_off.x),
            ("wall_jump_off.y", self.wall_jump_off.y),
            ("wall_leap.x", self.wall_leap.x),
            ("wall_leap.y", self.wall_leap.y),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(())
    }
}

/// Player intent for one step. Jump fields are button edges, not levels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionInput {
    pub direction: Vec2,
    pub jump_pressed: bool,
    pub jump_released: bool,
}

#[derive(Clone, Debug)]
pub struct Locomotion {
    settings: LocomotionSettings,
    gravity: f32,
    max_jump_velocity: f32,
    min_jump_velocity: f32,

    velocity: Vec2,
    velocity_x_smoothing: f32,
    time_to_wall_unstick: f32,
    wall_sliding: bool,
    wall_direction: i8,
}

impl Locomotion {
    pub fn new(settings: LocomotionSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let apex = settings.time_to_jump_apex_secs;
        let gravity = -(2.0 * settings.max_jump_height) / (apex * apex);

        Ok(Self {
            settings,
            gravity,
            max_jump_velocity: gravity.abs() * apex,
            min_jump_velocity: (2.0 * gravity.abs() * settings.min_jump_height).sqrt(),
            velocity: Vec2::zeros(),
            velocity_x_smoothing: 0.0,
            time_to_wall_unstick: 0.0,
            wall_sliding: false,
            wall_direction: 1,
        })
    }

    #[inline]
    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    #[inline]
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    #[inline]
    pub fn max_jump_velocity(&self) -> f32 {
        self.max_jump_velocity
    }

    #[inline]
    pub fn min_jump_velocity(&self) -> f32 {
        self.min_jump_velocity
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overwrite the velocity, e.g. on respawn. Clears horizontal smoothing.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.velocity_x_smoothing = 0.0;
    }

    #[inline]
    pub fn is_wall_sliding(&self) -> bool {
        self.wall_sliding
    }

    /// Side of the wall last considered for sliding: `-1` left, `1` right.
    #[inline]
    pub fn wall_direction(&self) -> i8 {
        self.wall_direction
    }

    /// Update the velocity from `input` and return this step's desired displacement.
    ///
    /// `collisions` is the state left by the previous move.
    pub fn desired_displacement(
        &mut self,
        input: &LocomotionInput,
        collisions: &CollisionState,
        dt: f32,
    ) -> Vec2 {
        if input.jump_pressed {
            self.jump(input.direction.x, collisions);
        }
        if input.jump_released {
            self.release_jump();
        }

        self.accelerate(input.direction.x, collisions, dt);
        self.handle_wall_sliding(input.direction.x, collisions, dt);

        self.velocity * dt
    }

    /// Apply the outcome of the move: contact above or below stops vertical motion,
    /// except on a too-steep slope where gravity keeps pulling along it.
    pub fn land(&mut self, collisions: &CollisionState, dt: f32) {
        if collisions.above || collisions.below {
            if collisions.sliding_down_max_slope {
                self.velocity.y += collisions.slope_normal.y * -self.gravity * dt;
            } else {
                self.velocity.y = 0.0;
            }
        }
    }

    fn accelerate(&mut self, input_x: f32, collisions: &CollisionState, dt: f32) {
        let target = input_x * self.settings.move_speed;
        let smooth_time = if collisions.below {
            self.settings.acceleration_time_grounded
        } else {
            self.settings.acceleration_time_airborne
        };
        self.velocity.x = smooth_damp(
            self.velocity.x,
            target,
            &mut self.velocity_x_smoothing,
            smooth_time,
            dt,
        );
        self.velocity.y += self.gravity * dt;
    }

    fn handle_wall_sliding(&mut self, input_x: f32, collisions: &CollisionState, dt: f32) {
        self.wall_direction = if collisions.left { -1 } else { 1 };
        self.wall_sliding =
            (collisions.left || collisions.right) && !collisions.below && self.velocity.y < 0.0;
        if !self.wall_sliding {
            return;
        }

        self.velocity.y = self.velocity.y.max(-self.settings.wall_slide_speed_max);

        if self.time_to_wall_unstick > 0.0 {
            self.velocity_x_smoothing = 0.0;
            self.velocity.x = 0.0;

            let input = axis_sign(input_x);
            if input != 0 && input != self.wall_direction {
                self.time_to_wall_unstick -= dt;
            } else {
                self.time_to_wall_unstick = self.settings.wall_stick_time_secs;
            }
        } else {
            self.time_to_wall_unstick = self.settings.wall_stick_time_secs;
        }
    }

    fn jump(&mut self, input_x: f32, collisions: &CollisionState) {
        if self.wall_sliding {
            let input = axis_sign(input_x);
            let jump = if input == self.wall_direction {
                self.settings.wall_jump_climb
            } else if input == 0 {
                self.settings.wall_jump_off
            } else {
                self.settings.wall_leap
            };
            self.velocity = Vec2::new(-f32::from(self.wall_direction) * jump.x, jump.y);
        }

        if collisions.below {
            if collisions.sliding_down_max_slope {
                // Jumping into the slope does nothing.
                let into_slope = -sign(collisions.slope_normal.x);
                if f32::from(axis_sign(input_x)) != into_slope {
                    self.velocity = collisions.slope_normal * self.max_jump_velocity;
                }
            } else {
                self.velocity.y = self.max_jump_velocity;
            }
        }
    }

    fn release_jump(&mut self) {
        self.velocity.y = self.velocity.y.min(self.min_jump_velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn locomotion() -> Locomotion {
        Locomotion::new(LocomotionSettings::default()).unwrap()
    }

    fn grounded() -> CollisionState {
        CollisionState {
            below: true,
            ..CollisionState::default()
        }
    }

    fn on_right_wall() -> CollisionState {
        CollisionState {
            right: true,
            ..CollisionState::default()
        }
    }

    #[test]
    fn derives_jump_physics_from_heights() {
        let l = locomotion();
        assert_relative_eq!(l.gravity(), -50.0, epsilon = 1.0e-4);
        assert_relative_eq!(l.max_jump_velocity(), 20.0, epsilon = 1.0e-4);
        assert_relative_eq!(l.min_jump_velocity(), 10.0, epsilon = 1.0e-4);
    }

    #[test]
    fn ground_jump_and_early_release() {
        let mut l = locomotion();
        let jump = LocomotionInput {
            jump_pressed: true,
            ..LocomotionInput::default()
        };

        let d = l.desired_displacement(&jump, &grounded(), DT);
        assert_relative_eq!(l.velocity().y, 20.0 - 50.0 * DT, epsilon = 1.0e-4);
        assert_relative_eq!(d.y, l.velocity().y * DT, epsilon = 1.0e-6);

        let release = LocomotionInput {
            jump_released: true,
            ..LocomotionInput::default()
        };
        l.desired_displacement(&release, &CollisionState::default(), DT);
        assert_relative_eq!(l.velocity().y, 10.0 - 50.0 * DT, epsilon = 1.0e-4);
    }

    #[test]
    fn no_jump_in_mid_air() {
        let mut l = locomotion();
        let jump = LocomotionInput {
            jump_pressed: true,
            ..LocomotionInput::default()
        };
        l.desired_displacement(&jump, &CollisionState::default(), DT);
        assert!(l.velocity().y < 0.0);
    }

    #[test]
    fn landing_stops_fall() {
        let mut l = locomotion();
        let idle = LocomotionInput::default();
        for _ in 0..10 {
            l.desired_displacement(&idle, &CollisionState::default(), DT);
        }
        assert!(l.velocity().y < -5.0);

        l.land(&grounded(), DT);
        assert_eq!(l.velocity().y, 0.0);
    }

    #[test]
    fn accelerates_toward_move_speed() {
        let mut l = locomotion();
        let right = LocomotionInput {
            direction: Vec2::new(1.0, 0.0),
            ..LocomotionInput::default()
        };
        let mut last = 0.0;
        for _ in 0..120 {
            l.desired_displacement(&right, &grounded(), DT);
            l.land(&grounded(), DT);
            assert!(l.velocity().x >= last);
            assert!(l.velocity().x <= 6.0);
            last = l.velocity().x;
        }
        assert_relative_eq!(l.velocity().x, 6.0, epsilon = 1.0e-2);
    }

    #[test]
    fn wall_slide_caps_fall_speed_and_sticks() {
        let mut l = locomotion();
        l.set_velocity(Vec2::new(0.0, -10.0));
        let away = LocomotionInput {
            direction: Vec2::new(-1.0, 0.0),
            ..LocomotionInput::default()
        };

        l.desired_displacement(&away, &on_right_wall(), DT);
        assert!(l.is_wall_sliding());
        assert_eq!(l.wall_direction(), 1);
        assert_relative_eq!(l.velocity().y, -3.0);

        // Stuck: horizontal input away from the wall is ignored for a while.
        l.desired_displacement(&away, &on_right_wall(), DT);
        assert_eq!(l.velocity().x, 0.0);
    }

    #[test]
    fn wall_jumps_depend_on_input() {
        let cases = [
            (1.0, Vec2::new(-7.5, 16.0)),
            (0.0, Vec2::new(-8.5, 7.0)),
            (-1.0, Vec2::new(-18.0, 17.0)),
        ];
        for (input_x, expected) in cases {
            let mut l = locomotion();
            l.set_velocity(Vec2::new(0.0, -1.0));
            l.desired_displacement(&LocomotionInput::default(), &on_right_wall(), DT);
            assert!(l.is_wall_sliding());

            l.jump(input_x, &on_right_wall());
            assert_eq!(l.velocity(), expected);
        }
    }

    #[test]
    fn max_slope_jump_follows_normal() {
        let normal = Vec2::new(-0.6, 0.8);
        let sliding = CollisionState {
            below: true,
            sliding_down_max_slope: true,
            slope_normal: normal,
            ..CollisionState::default()
        };

        let mut l = locomotion();
        l.jump(0.0, &sliding);
        assert_relative_eq!(l.velocity(), normal * 20.0, epsilon = 1.0e-4);

        // Pushing into the slope (normal points left, so input right) does not jump.
        let mut l = locomotion();
        l.jump(1.0, &sliding);
        assert_eq!(l.velocity(), Vec2::zeros());
    }

    #[test]
    fn gravity_follows_max_slope_after_move() {
        let sliding = CollisionState {
            below: true,
            sliding_down_max_slope: true,
            slope_normal: Vec2::new(-0.6, 0.8),
            ..CollisionState::default()
        };
        let mut l = locomotion();
        l.set_velocity(Vec2::new(0.0, -2.0));
        l.land(&sliding, DT);
        assert_relative_eq!(l.velocity().y, -2.0 + 0.8 * 50.0 * DT, epsilon = 1.0e-5);
    }

    #[test]
    fn rejects_non_positive_jump_height() {
        let settings = LocomotionSettings {
            max_jump_height: 0.0,
            ..LocomotionSettings::default()
        };
        assert!(matches!(
            Locomotion::new(settings),
            Err(ConfigError::NotPositive { name: "max_jump_height", .. })
        ));
    }
}
