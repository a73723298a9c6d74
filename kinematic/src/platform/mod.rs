/*!
Moving platforms and passenger transport.

A platform is a box that follows a [`WaypointPath`] and carries or pushes the
bodies around it. Transport runs in two phases around the platform's own
translation so that riders are never left overlapping it:

1. [`PlatformController::advance`] computes this step's displacement.
2. [`PlatformController::detect_passengers`] probes for riders at the pre-move position.
3. Riders in [`TransportPhase::BeforePlatform`] are moved through their own controller.
4. [`PlatformController::translate`] moves the platform.
5. Riders in [`TransportPhase::AfterPlatform`] are moved.

The caller owns the riders and drives the phases (see the `sim` crate).
*/

pub mod passenger;
pub mod path;

use std::time::Duration;

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, DEFAULT_HORIZONTAL_RAY_COUNT, DEFAULT_VERTICAL_RAY_COUNT, SKIN_WIDTH,
    collision::{Bounds, CollisionLayers, RayCaster, RaycastProbe, Vec2},
};

pub use passenger::PassengerMovement;
pub use path::{PathSettings, WaypointPath, ease};

/// Platform tuning: its own ray fan plus the path it follows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PlatformSettings {
    pub skin_width: f32,
    pub horizontal_ray_count: usize,
    pub vertical_ray_count: usize,
    /// Layers that count as riders.
    pub passenger_mask: CollisionLayers,
    pub path: PathSettings,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            skin_width: SKIN_WIDTH,
            horizontal_ray_count: DEFAULT_HORIZONTAL_RAY_COUNT,
            vertical_ray_count: DEFAULT_VERTICAL_RAY_COUNT,
            passenger_mask: CollisionLayers::ALL,
            path: PathSettings::default(),
        }
    }
}

/// When a rider moves relative to the platform translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportPhase {
    BeforePlatform,
    AfterPlatform,
}

impl PassengerMovement {
    #[inline]
    pub fn phase(&self) -> TransportPhase {
        if self.move_before_platform {
            TransportPhase::BeforePlatform
        } else {
            TransportPhase::AfterPlatform
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlatformController {
    position: Vec2,
    probe: RaycastProbe,
    path: WaypointPath,
    passenger_mask: CollisionLayers,
    displacement: Vec2,
    passengers: Vec<PassengerMovement>,
}

impl PlatformController {
    /// Platform centered at `position`; waypoints are relative to it.
    pub fn new(settings: &PlatformSettings, half_extents: Vec2, position: Vec2) -> Result<Self, ConfigError> {
        let probe = RaycastProbe::new(
            half_extents,
            settings.skin_width,
            settings.horizontal_ray_count,
            settings.vertical_ray_count,
        )?;
        let path = WaypointPath::new(&settings.path, position)?;

        debug!(
            "platform built at ({}, {}) with {} waypoints, cyclic={}",
            position.x,
            position.y,
            path.waypoints().len(),
            settings.path.cyclic
        );

        Ok(Self {
            position,
            probe,
            path,
            passenger_mask: settings.passenger_mask,
            displacement: Vec2::zeros(),
            passengers: Vec::new(),
        })
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.probe.half_extents()
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.probe.bounds(self.position)
    }

    #[inline]
    pub fn path(&self) -> &WaypointPath {
        &self.path
    }

    /// Displacement computed by the latest [`advance`](Self::advance).
    #[inline]
    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    /// Compute this step's displacement along the path. Zero while waiting.
    pub fn advance(&mut self, dt: f32, now: Duration) -> Vec2 {
        self.displacement = self.path.advance(self.position, dt, now);
        self.displacement
    }

    /// Find the riders affected by the pending displacement.
    ///
    /// Replaces the result of the previous call.
    pub fn detect_passengers<W: RayCaster + ?Sized>(&mut self, world: &W) -> &[PassengerMovement] {
        self.passengers.clear();
        self.probe.update_origins(self.position);
        passenger::detect_passengers(
            world,
            &self.probe,
            self.displacement,
            self.passenger_mask,
            &mut self.passengers,
        );
        &self.passengers
    }

    #[inline]
    pub fn passengers(&self) -> &[PassengerMovement] {
        &self.passengers
    }

    /// Riders to move in `phase`, in detection order.
    pub fn riders(&self, phase: TransportPhase) -> impl Iterator<Item = &PassengerMovement> + '_ {
        self.passengers.iter().filter(move |p| p.phase() == phase)
    }

    /// Apply the pending displacement to the platform.
    #[inline]
    pub fn translate(&mut self) {
        self.position += self.displacement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{collision::ColliderId, test_support::TestWorld};
    use approx::assert_relative_eq;

    const RIDER: ColliderId = ColliderId(50);

    fn platform(displacement_per_second: Vec2) -> PlatformController {
        let settings = PlatformSettings {
            path: PathSettings {
                local_waypoints: vec![Vec2::zeros(), displacement_per_second * 10.0],
                speed: displacement_per_second.norm(),
                ..PathSettings::default()
            },
            ..PlatformSettings::default()
        };
        PlatformController::new(&settings, Vec2::new(1.0, 0.25), Vec2::zeros()).unwrap()
    }

    /// Rider box resting on the platform top (y = 0.25).
    fn rider_on_top() -> TestWorld {
        TestWorld::new().with_box(Vec2::new(-0.5, 0.25), Vec2::new(0.5, 1.25), RIDER)
    }

    #[test]
    fn rising_platform_pushes_rider_before_moving() {
        let mut p = platform(Vec2::new(0.0, 1.0));
        let world = rider_on_top();

        let d = p.advance(0.1, Duration::ZERO);
        assert_relative_eq!(d, Vec2::new(0.0, 0.1), epsilon = 1.0e-5);

        let riders = p.detect_passengers(&world).to_vec();
        assert_eq!(riders.len(), 1);
        let r = riders[0];
        assert_eq!(r.rider, RIDER);
        assert!(r.standing_on_platform && r.move_before_platform);
        // Hit at exactly one skin width, so the whole rise is passed on.
        assert_relative_eq!(r.displacement, Vec2::new(0.0, 0.1), epsilon = 1.0e-5);
        assert_eq!(p.riders(TransportPhase::BeforePlatform).count(), 1);
        assert_eq!(p.riders(TransportPhase::AfterPlatform).count(), 0);
    }

    #[test]
    fn sideways_platform_carries_rider_after_moving() {
        let mut p = platform(Vec2::new(1.0, 0.0));
        let world = rider_on_top();

        p.advance(0.1, Duration::ZERO);
        let riders = p.detect_passengers(&world).to_vec();

        assert_eq!(riders.len(), 1);
        assert!(riders[0].standing_on_platform);
        assert_eq!(riders[0].phase(), TransportPhase::AfterPlatform);
        assert_relative_eq!(riders[0].displacement, Vec2::new(0.1, 0.0), epsilon = 1.0e-5);

        p.translate();
        assert_relative_eq!(p.position(), Vec2::new(0.1, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn sinking_platform_carries_rider_down() {
        let mut p = platform(Vec2::new(0.0, -1.0));
        let world = rider_on_top();

        p.advance(0.1, Duration::ZERO);
        let riders = p.detect_passengers(&world);

        assert_eq!(riders.len(), 1);
        assert!(!riders[0].move_before_platform);
        assert_relative_eq!(riders[0].displacement, Vec2::new(0.0, -0.1), epsilon = 1.0e-5);
    }

    #[test]
    fn pushes_body_in_front() {
        let mut p = platform(Vec2::new(2.0, 0.0));
        // Rider's left face 0.065 from the shrunk right face.
        let world = TestWorld::new().with_box(Vec2::new(1.05, -0.25), Vec2::new(2.05, 0.75), RIDER);

        p.advance(0.1, Duration::ZERO);
        let riders = p.detect_passengers(&world);

        assert_eq!(riders.len(), 1);
        let r = riders[0];
        assert!(!r.standing_on_platform && r.move_before_platform);
        assert_relative_eq!(r.displacement.x, 0.2 - 0.05, epsilon = 1.0e-5);
        assert_relative_eq!(r.displacement.y, -SKIN_WIDTH);
    }

    #[test]
    fn ignores_distant_and_overlapping_bodies() {
        let mut p = platform(Vec2::new(0.0, 1.0));
        let world = TestWorld::new()
            .with_box(Vec2::new(-0.5, 3.0), Vec2::new(0.5, 4.0), ColliderId(1))
            // Covers the whole platform: every ray starts inside it.
            .with_box(Vec2::new(-2.0, -1.0), Vec2::new(2.0, 1.0), ColliderId(2));

        p.advance(0.1, Duration::ZERO);
        assert!(p.detect_passengers(&world).is_empty());
    }

    #[test]
    fn rejects_invalid_platform() {
        let settings = PlatformSettings::default();
        assert_eq!(
            PlatformController::new(&settings, Vec2::new(1.0, 1.0), Vec2::zeros()).err(),
            Some(ConfigError::TooFewWaypoints(0))
        );
    }
}
