/*!
Kinematic controller settings and validation.

Angles are authored in degrees and converted to radians once, when the
controller is built. Distances are world units, time is seconds.

Keep the defaults in `crate::constants`; override per body from game data.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, DEFAULT_HORIZONTAL_RAY_COUNT, DEFAULT_MAX_CLIMB_ANGLE_DEG,
    DEFAULT_MAX_DESCEND_ANGLE_DEG, DEFAULT_MAX_SLOPE_ANGLE_DEG, DEFAULT_VERTICAL_RAY_COUNT,
    PASS_THROUGH_COOLDOWN, SKIN_WIDTH, utils::secs_to_duration,
};

use super::types::CollisionLayers;

/// Designer-facing tuning for one [`Controller`](super::Controller).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ControllerSettings {
    /// Inward shrink of the bounds before casting.
    pub skin_width: f32,

    /// Rays along the left/right faces (>= 2).
    pub horizontal_ray_count: usize,

    /// Rays along the top/bottom faces (>= 2).
    pub vertical_ray_count: usize,

    /// Steepest walkable slope (degrees).
    pub max_climb_angle_deg: f32,

    /// Steepest slope followed downward (degrees).
    pub max_descend_angle_deg: f32,

    /// Slopes steeper than this (degrees) cannot be stood on and are slid down.
    pub max_slope_angle_deg: f32,

    /// Layers this body collides with.
    pub collision_mask: CollisionLayers,

    /// Seconds a one-way platform stays ignored after dropping through it.
    pub pass_through_cooldown_secs: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            skin_width: SKIN_WIDTH,
            horizontal_ray_count: DEFAULT_HORIZONTAL_RAY_COUNT,
            vertical_ray_count: DEFAULT_VERTICAL_RAY_COUNT,
            max_climb_angle_deg: DEFAULT_MAX_CLIMB_ANGLE_DEG,
            max_descend_angle_deg: DEFAULT_MAX_DESCEND_ANGLE_DEG,
            max_slope_angle_deg: DEFAULT_MAX_SLOPE_ANGLE_DEG,
            collision_mask: CollisionLayers::ALL,
            pass_through_cooldown_secs: PASS_THROUGH_COOLDOWN.as_secs_f32(),
        }
    }
}

impl ControllerSettings {
    /// Check everything that does not depend on the body size.
    ///
    /// Ray counts and skin width are checked again together with the size when
    /// the probe is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.skin_width.is_finite() || self.skin_width <= 0.0 {
            return Err(ConfigError::SkinWidth(self.skin_width));
        }

        for (name, value) in [
            ("max_climb_angle_deg", self.max_climb_angle_deg),
            ("max_descend_angle_deg", self.max_descend_angle_deg),
            ("max_slope_angle_deg", self.max_slope_angle_deg),
        ] {
            if !(0.0..90.0).contains(&value) {
                return Err(ConfigError::SlopeAngle { name, value });
            }
        }

        let cooldown = self.pass_through_cooldown_secs;
        if !cooldown.is_finite() || cooldown < 0.0 {
            return Err(ConfigError::Cooldown(cooldown));
        }
        secs_to_duration("pass_through_cooldown_secs", cooldown)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ControllerSettings::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_vertical_or_nan_angles() {
        let settings = ControllerSettings {
            max_slope_angle_deg: 90.0,
            ..ControllerSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::SlopeAngle { name: "max_slope_angle_deg", .. })
        ));

        let settings = ControllerSettings {
            max_climb_angle_deg: f32::NAN,
            ..ControllerSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_bad_skin_and_cooldown() {
        let settings = ControllerSettings {
            skin_width: 0.0,
            ..ControllerSettings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::SkinWidth(0.0)));

        let settings = ControllerSettings {
            pass_through_cooldown_secs: -1.0,
            ..ControllerSettings::default()
        };
        assert_eq!(settings.validate(), Err(ConfigError::Cooldown(-1.0)));

        let settings = ControllerSettings {
            pass_through_cooldown_secs: 1.0e30,
            ..ControllerSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::DurationOutOfRange { name: "pass_through_cooldown_secs", .. })
        ));
    }
}
