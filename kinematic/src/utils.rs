use std::time::Duration;

use crate::{ConfigError, INPUT_DEAD_ZONE, Vec2};

/// Sign of `v` as `±1.0`, with zero mapping to `+1.0`.
///
/// Ray directions are always derived from this so that a body at rest still
/// probes in a well-defined direction.
#[inline]
pub fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Three-way sign of a directional input axis: `-1`, `0`, or `1`.
#[inline]
pub fn axis_sign(v: f32) -> i8 {
    if v > INPUT_DEAD_ZONE {
        1
    } else if v < -INPUT_DEAD_ZONE {
        -1
    } else {
        0
    }
}

/// Unsigned angle (radians) between a surface normal and world up.
///
/// A degenerate (zero) normal reads as a flat floor.
#[inline]
pub fn slope_angle(normal: Vec2) -> f32 {
    match normal.try_normalize(1.0e-12) {
        Some(n) => n.y.clamp(-1.0, 1.0).acos(),
        None => 0.0,
    }
}

/// True when two slope angles should be treated as different surfaces.
#[inline]
pub fn angles_differ(a: f32, b: f32) -> bool {
    (a - b).abs() > crate::SLOPE_ANGLE_EPS
}

/// Settings seconds as a [`Duration`]. Negative, non-finite and oversized values are errors.
pub fn secs_to_duration(name: &'static str, secs: f32) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f32(secs)
        .map_err(|_| ConfigError::DurationOutOfRange { name, value: secs })
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries the spring state between calls. `smooth_time` is roughly
/// the time it takes to reach the target. The result never overshoots.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1.0e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp overshoot.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn secs_to_duration_rejects_out_of_range() {
        assert_eq!(secs_to_duration("wait", 0.5), Ok(Duration::from_millis(500)));
        assert_eq!(
            secs_to_duration("wait", 1.0e30),
            Err(ConfigError::DurationOutOfRange { name: "wait", value: 1.0e30 })
        );
        assert!(secs_to_duration("wait", -1.0).is_err());
        assert!(secs_to_duration("wait", f32::NAN).is_err());
    }

    #[test]
    fn sign_treats_zero_as_positive() {
        assert_eq!(sign(0.0), 1.0);
        assert_eq!(sign(-0.0), 1.0);
        assert_eq!(sign(-3.0), -1.0);
    }

    #[test]
    fn axis_sign_respects_dead_zone() {
        assert_eq!(axis_sign(0.0), 0);
        assert_eq!(axis_sign(1.0e-4), 0);
        assert_eq!(axis_sign(0.7), 1);
        assert_eq!(axis_sign(-1.0), -1);
    }

    #[test]
    fn slope_angle_of_common_normals() {
        assert_relative_eq!(slope_angle(Vec2::new(0.0, 1.0)), 0.0);
        assert_relative_eq!(slope_angle(Vec2::new(1.0, 0.0)), std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(slope_angle(Vec2::new(-1.0, 1.0)), FRAC_PI_4, epsilon = 1.0e-6);
        assert_eq!(slope_angle(Vec2::zeros()), 0.0);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let mut v = 0.0;
        let mut x = 0.0;
        for _ in 0..600 {
            x = smooth_damp(x, 6.0, &mut v, 0.1, 1.0 / 60.0);
            assert!(x <= 6.0);
        }
        assert_relative_eq!(x, 6.0, epsilon = 1.0e-3);
    }

    #[test]
    fn smooth_damp_ignores_non_positive_dt() {
        let mut v = 1.0;
        assert_eq!(smooth_damp(2.0, 5.0, &mut v, 0.1, 0.0), 2.0);
        assert_eq!(v, 1.0);
    }
}
