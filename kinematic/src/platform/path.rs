use std::time::Duration;

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Vec2, utils::secs_to_duration};

/// Waypoint traversal tuning for a moving platform.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PathSettings {
    /// Waypoints relative to the platform's starting position.
    pub local_waypoints: Vec<Vec2>,
    /// World units per second along a segment.
    pub speed: f32,
    /// Wrap from the last waypoint back to the first instead of reversing.
    pub cyclic: bool,
    /// Seconds to hold still at every waypoint.
    pub wait_time_secs: f32,
    /// `0` is linear; larger values ease in and out harder.
    pub ease_amount: f32,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            local_waypoints: Vec::new(),
            speed: 3.0,
            cyclic: false,
            wait_time_secs: 0.0,
            ease_amount: 0.0,
        }
    }
}

impl PathSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let points = &self.local_waypoints;
        if points.len() < 2 {
            return Err(ConfigError::TooFewWaypoints(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ConfigError::NonFiniteWaypoint { index });
        }

        let segments = if self.cyclic { points.len() } else { points.len() - 1 };
        for from in 0..segments {
            let to = (from + 1) % points.len();
            if (points[to] - points[from]).norm_squared() <= f32::EPSILON {
                return Err(ConfigError::ZeroLengthSegment { from, to });
            }
        }

        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "speed",
                value: self.speed,
            });
        }
        for (name, value) in [
            ("wait_time_secs", self.wait_time_secs),
            ("ease_amount", self.ease_amount),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        secs_to_duration("wait_time_secs", self.wait_time_secs)?;
        Ok(())
    }
}

/// Symmetric ease in/out: `tᵃ / (tᵃ + (1 - t)ᵃ)` with `a = ease_amount + 1`.
///
/// `ease(0) == 0`, `ease(1) == 1` and `ease(0.5) == 0.5` for every `ease_amount >= 0`.
#[inline]
pub fn ease(t: f32, ease_amount: f32) -> f32 {
    let a = ease_amount + 1.0;
    let head = t.powf(a);
    head / (head + (1.0 - t).powf(a))
}

/// World-space waypoint traversal state.
#[derive(Clone, Debug)]
pub struct WaypointPath {
    waypoints: Vec<Vec2>,
    speed: f32,
    cyclic: bool,
    wait_time: Duration,
    ease_amount: f32,

    from_index: usize,
    /// Progress through the current segment, `0..=1`.
    percent: f32,
    next_move_time: Duration,
}

impl WaypointPath {
    /// Resolve `settings.local_waypoints` against `origin`.
    pub fn new(settings: &PathSettings, origin: Vec2) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            waypoints: settings.local_waypoints.iter().map(|p| p + origin).collect(),
            speed: settings.speed,
            cyclic: settings.cyclic,
            wait_time: secs_to_duration("wait_time_secs", settings.wait_time_secs)?,
            ease_amount: settings.ease_amount,
            from_index: 0,
            percent: 0.0,
            next_move_time: Duration::ZERO,
        })
    }

    /// Current waypoint order; ping-pong paths reverse it at the far end.
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn from_index(&self) -> usize {
        self.from_index
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    /// True while holding at a waypoint.
    pub fn is_waiting(&self, now: Duration) -> bool {
        now < self.next_move_time
    }

    /// Displacement that takes a platform at `position` to its next point on the path.
    pub fn advance(&mut self, position: Vec2, dt: f32, now: Duration) -> Vec2 {
        if self.is_waiting(now) {
            return Vec2::zeros();
        }

        let len = self.waypoints.len();
        self.from_index %= len;
        let to_index = (self.from_index + 1) % len;
        let from = self.waypoints[self.from_index];
        let to = self.waypoints[to_index];

        let distance = (to - from).norm();
        self.percent = (self.percent + dt * self.speed / distance).clamp(0.0, 1.0);
        let eased = ease(self.percent, self.ease_amount);
        let target = from.lerp(&to, eased);

        if self.percent >= 1.0 {
            self.percent = 0.0;
            self.from_index += 1;

            if !self.cyclic && self.from_index >= len - 1 {
                self.from_index = 0;
                self.waypoints.reverse();
            }
            self.next_move_time = now.saturating_add(self.wait_time);

            debug!(
                "platform reached waypoint {to_index}, next segment starts at {}",
                self.from_index
            );
        }

        target - position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_points() -> PathSettings {
        PathSettings {
            local_waypoints: vec![Vec2::zeros(), Vec2::new(2.0, 0.0)],
            speed: 2.0,
            ..PathSettings::default()
        }
    }

    #[test]
    fn ease_fixed_points() {
        for amount in [0.0, 1.0, 2.5] {
            assert_relative_eq!(ease(0.0, amount), 0.0);
            assert_relative_eq!(ease(1.0, amount), 1.0);
            assert_relative_eq!(ease(0.5, amount), 0.5, epsilon = 1.0e-6);
        }
        // Linear when not easing.
        assert_relative_eq!(ease(0.25, 0.0), 0.25, epsilon = 1.0e-6);
        // Eased paths start slower.
        assert!(ease(0.25, 2.0) < 0.25);
    }

    #[test]
    fn ping_pong_reverses_after_reaching_the_end() {
        let origin = Vec2::new(10.0, 5.0);
        let mut path = WaypointPath::new(&two_points(), origin).unwrap();
        let mut position = origin;
        let t = Duration::ZERO;

        position += path.advance(position, 0.5, t);
        assert_relative_eq!(position, Vec2::new(11.0, 5.0), epsilon = 1.0e-5);

        position += path.advance(position, 0.5, t);
        assert_relative_eq!(position, Vec2::new(12.0, 5.0), epsilon = 1.0e-5);
        assert_eq!(path.waypoints()[0], Vec2::new(12.0, 5.0));
        assert_eq!(path.from_index(), 0);

        let back = path.advance(position, 0.5, t);
        assert!(back.x < 0.0);
        assert_relative_eq!(back, Vec2::new(-1.0, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn ping_pong_walks_every_waypoint_back_and_forth() {
        let settings = PathSettings {
            local_waypoints: vec![Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            speed: 1.0,
            ..PathSettings::default()
        };
        let mut path = WaypointPath::new(&settings, Vec2::zeros()).unwrap();
        let mut position = Vec2::zeros();

        let expected = [
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::zeros(),
            Vec2::new(1.0, 0.0),
        ];
        for (step, want) in expected.into_iter().enumerate() {
            position += path.advance(position, 1.0, Duration::ZERO);
            assert_relative_eq!(position, want, epsilon = 1.0e-5);
            if step == 1 {
                assert_eq!(path.waypoints()[0], Vec2::new(1.0, 1.0));
                assert_eq!(path.from_index(), 0);
            }
        }
        assert_eq!(path.waypoints()[0], Vec2::zeros());
    }

    #[test]
    fn cyclic_path_wraps_to_first_waypoint() {
        let settings = PathSettings {
            local_waypoints: vec![Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            speed: 1.0,
            cyclic: true,
            ..PathSettings::default()
        };
        let mut path = WaypointPath::new(&settings, Vec2::zeros()).unwrap();
        let mut position = Vec2::zeros();

        for _ in 0..2 {
            position += path.advance(position, 1.0, Duration::ZERO);
        }
        assert_relative_eq!(position, Vec2::new(1.0, 1.0), epsilon = 1.0e-5);
        assert_eq!(path.from_index(), 2);

        // Closing segment is sqrt(2) long.
        position += path.advance(position, 2.0_f32.sqrt(), Duration::ZERO);
        assert_relative_eq!(position, Vec2::zeros(), epsilon = 1.0e-5);
        assert_eq!(path.waypoints()[0], Vec2::zeros());
    }

    #[test]
    fn waits_at_waypoints() {
        let settings = PathSettings {
            wait_time_secs: 1.0,
            ..two_points()
        };
        let mut path = WaypointPath::new(&settings, Vec2::zeros()).unwrap();
        let mut position = Vec2::zeros();

        position += path.advance(position, 1.0, Duration::from_secs(1));
        assert_relative_eq!(position, Vec2::new(2.0, 0.0), epsilon = 1.0e-5);

        assert!(path.is_waiting(Duration::from_millis(1500)));
        assert_eq!(path.advance(position, 0.1, Duration::from_millis(1500)), Vec2::zeros());

        let d = path.advance(position, 0.25, Duration::from_secs(2));
        assert_relative_eq!(d, Vec2::new(-0.5, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn validation_rejects_bad_paths() {
        let one = PathSettings {
            local_waypoints: vec![Vec2::zeros()],
            ..PathSettings::default()
        };
        assert_eq!(one.validate(), Err(ConfigError::TooFewWaypoints(1)));

        let repeated = PathSettings {
            local_waypoints: vec![Vec2::zeros(), Vec2::zeros()],
            ..PathSettings::default()
        };
        assert_eq!(
            repeated.validate(),
            Err(ConfigError::ZeroLengthSegment { from: 0, to: 1 })
        );

        let stalled = PathSettings {
            speed: 0.0,
            ..two_points()
        };
        assert!(matches!(stalled.validate(), Err(ConfigError::NotPositive { name: "speed", .. })));

        let negative_wait = PathSettings {
            wait_time_secs: -1.0,
            ..two_points()
        };
        assert!(matches!(
            negative_wait.validate(),
            Err(ConfigError::Negative { name: "wait_time_secs", .. })
        ));

        let nan = PathSettings {
            local_waypoints: vec![Vec2::zeros(), Vec2::new(f32::NAN, 0.0)],
            ..PathSettings::default()
        };
        assert_eq!(nan.validate(), Err(ConfigError::NonFiniteWaypoint { index: 1 }));

        let endless_wait = PathSettings {
            wait_time_secs: 1.0e30,
            ..two_points()
        };
        assert!(matches!(
            endless_wait.validate(),
            Err(ConfigError::DurationOutOfRange { name: "wait_time_secs", .. })
        ));
        assert!(WaypointPath::new(&endless_wait, Vec2::zeros()).is_err());
    }
}
