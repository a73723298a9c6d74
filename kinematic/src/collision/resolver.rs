use std::time::Duration;

use log::{debug, trace, warn};

use crate::{
    ConfigError, DROP_THROUGH_INPUT_Y, SLOPE_ANGLE_EPS,
    utils::{angles_differ, secs_to_duration, sign, slope_angle},
};

use super::{
    probe::RaycastProbe,
    query::{RayCaster, RayFilter},
    settings::ControllerSettings,
    state::CollisionState,
    types::{RayHit, Vec2},
};

/// Everything the resolver needs for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveRequest {
    /// Displacement the body wants this step (velocity * dt).
    pub displacement: Vec2,
    /// Raw directional intent, each axis in `[-1, 1]`. `input.y == -1` asks to drop
    /// through one-way platforms.
    pub input: Vec2,
    /// The body is being carried by a platform this step; pins `below`.
    pub resting_on_platform: bool,
    /// Monotonic simulation time of this step.
    pub now: Duration,
}

impl MoveRequest {
    #[inline]
    pub fn new(displacement: Vec2, now: Duration) -> Self {
        Self {
            displacement,
            input: Vec2::zeros(),
            resting_on_platform: false,
            now,
        }
    }

    #[inline]
    pub fn with_input(mut self, input: Vec2) -> Self {
        self.input = input;
        self
    }

    #[inline]
    pub fn with_resting_on_platform(mut self, resting: bool) -> Self {
        self.resting_on_platform = resting;
        self
    }
}

/// Result of one resolution step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Corrected displacement to add to the body position.
    pub displacement: Vec2,
    /// Collision state after this step.
    pub collisions: CollisionState,
}

/// Ray-fan kinematic controller for one axis-aligned box.
///
/// One instance per body. The controller owns the body's ray probe and
/// [`CollisionState`] but not its position: every step the caller passes the
/// current position in and applies the returned displacement.
///
/// Resolution order within a step is fixed: slope descend check, then
/// horizontal rays, then vertical rays offset by the horizontal result.
#[derive(Clone, Debug)]
pub struct Controller {
    settings: ControllerSettings,
    max_climb_angle: f32,
    max_descend_angle: f32,
    max_slope_angle: f32,
    pass_through_cooldown: Duration,
    probe: RaycastProbe,
    collisions: CollisionState,
    input: Vec2,
}

impl Controller {
    /// Build a controller for a box with the given half extents.
    pub fn new(settings: ControllerSettings, half_extents: Vec2) -> Result<Self, ConfigError> {
        settings.validate()?;
        let probe = RaycastProbe::new(
            half_extents,
            settings.skin_width,
            settings.horizontal_ray_count,
            settings.vertical_ray_count,
        )?;

        debug!(
            "controller built: half_extents=({}, {}) rays={}x{} climb={}° descend={}° slide>{}°",
            half_extents.x,
            half_extents.y,
            settings.horizontal_ray_count,
            settings.vertical_ray_count,
            settings.max_climb_angle_deg,
            settings.max_descend_angle_deg,
            settings.max_slope_angle_deg,
        );

        Ok(Self {
            settings,
            max_climb_angle: settings.max_climb_angle_deg.to_radians(),
            max_descend_angle: settings.max_descend_angle_deg.to_radians(),
            max_slope_angle: settings.max_slope_angle_deg.to_radians(),
            pass_through_cooldown: secs_to_duration(
                "pass_through_cooldown_secs",
                settings.pass_through_cooldown_secs,
            )?,
            probe,
            collisions: CollisionState::default(),
            input: Vec2::zeros(),
        })
    }

    #[inline]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Collision state produced by the latest step.
    #[inline]
    pub fn collisions(&self) -> &CollisionState {
        &self.collisions
    }

    #[inline]
    pub fn probe(&self) -> &RaycastProbe {
        &self.probe
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.probe.half_extents()
    }

    /// Change the body size. Ray spacing is recomputed; on error nothing changes.
    pub fn resize(&mut self, half_extents: Vec2) -> Result<(), ConfigError> {
        self.probe.resize(half_extents)
    }

    /// Resolve `request` for a body centered at `position` and apply the result.
    pub fn move_body<W: RayCaster + ?Sized>(
        &mut self,
        world: &W,
        position: &mut Vec2,
        request: MoveRequest,
    ) -> Motion {
        let motion = self.resolve(world, *position, request);
        *position += motion.displacement;
        motion
    }

    /// Constrain `request.displacement` against `world` for a body centered at `position`.
    pub fn resolve<W: RayCaster + ?Sized>(
        &mut self,
        world: &W,
        position: Vec2,
        request: MoveRequest,
    ) -> Motion {
        let mut displacement = request.displacement;
        if !displacement.x.is_finite() || !displacement.y.is_finite() {
            warn!("non-finite displacement {displacement:?} replaced with zero");
            displacement = Vec2::zeros();
        }

        self.input = request.input;
        self.collisions.poll_pass_through(request.now);
        self.probe.update_origins(position);
        self.collisions.begin_step(displacement);

        if displacement.y < 0.0 {
            self.descend_slope(world, &mut displacement);
        }

        // Facing follows the post-descend displacement.
        self.collisions.face_toward(displacement.x);

        self.horizontal_collisions(world, &mut displacement);

        if displacement.y != 0.0 {
            self.vertical_collisions(world, &mut displacement, request.now);
        }

        if request.resting_on_platform {
            self.collisions.below = true;
        }

        Motion {
            displacement,
            collisions: self.collisions,
        }
    }

    /// One-way surfaces are invisible to every cast while dropping through.
    #[inline]
    fn filter(&self) -> RayFilter {
        RayFilter::new(self.settings.collision_mask)
            .skipping_one_way(self.collisions.falling_through_platform)
    }

    fn cast<W: RayCaster + ?Sized>(
        &self,
        world: &W,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
    ) -> Option<RayHit> {
        world.cast_ray_filtered(origin, direction, max_distance, self.filter())
    }

    /// Re-cast a ray that passes a one-way surface, so solids behind it still block.
    fn cast_solid<W: RayCaster + ?Sized>(
        &self,
        world: &W,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
    ) -> Option<RayHit> {
        world.cast_ray_filtered(
            origin,
            direction,
            max_distance,
            self.filter().skipping_one_way(true),
        )
    }

    /// Whether a vertical ray goes through the one-way surface it hit.
    /// A drop request arms the pass-through latch.
    fn passes_one_way(&mut self, hit: &RayHit, direction_y: f32, now: Duration) -> bool {
        if direction_y > 0.0 || hit.is_resting_contact() {
            return true;
        }
        if self.input.y <= DROP_THROUGH_INPUT_Y {
            self.collisions.arm_pass_through(now, self.pass_through_cooldown);
            trace!(
                "dropping through one-way collider {:?} until {:?}",
                hit.collider,
                self.collisions.pass_through_until()
            );
            return true;
        }
        false
    }

    fn descend_slope<W: RayCaster + ?Sized>(&mut self, world: &W, displacement: &mut Vec2) {
        let skin = self.probe.skin();
        let origins = *self.probe.origins();
        let down = -Vec2::y();

        // Exactly one corner over a surface: check whether it is too steep to stand on.
        let ray_length = displacement.y.abs() + skin;
        let hit_left = self.cast(world, origins.bottom_left, down, ray_length);
        let hit_right = self.cast(world, origins.bottom_right, down, ray_length);
        if hit_left.is_some() != hit_right.is_some() {
            for hit in hit_left.iter().chain(hit_right.iter()) {
                self.slide_down_max_slope(hit, displacement);
            }
        }

        if self.collisions.sliding_down_max_slope {
            return;
        }

        // Cast from the trailing corner; that is the one still over the slope.
        let direction_x = sign(displacement.x);
        let origin = if direction_x < 0.0 {
            origins.bottom_right
        } else {
            origins.bottom_left
        };
        let Some(hit) = self.cast(world, origin, down, f32::MAX) else {
            return;
        };

        let angle = slope_angle(hit.normal);
        if angle <= SLOPE_ANGLE_EPS || angle > self.max_descend_angle {
            return;
        }
        if sign(hit.normal.x) != direction_x {
            return;
        }
        // Only follow the slope if it is reachable within this step's horizontal travel.
        if hit.distance - skin > angle.tan() * displacement.x.abs() {
            return;
        }

        let distance = displacement.x.abs();
        displacement.x = angle.cos() * distance * direction_x;
        displacement.y -= angle.sin() * distance;

        self.collisions.slope_angle = angle;
        self.collisions.slope_normal = hit.normal;
        self.collisions.descending_slope = true;
        self.collisions.below = true;
    }

    fn slide_down_max_slope(&mut self, hit: &RayHit, displacement: &mut Vec2) {
        let angle = slope_angle(hit.normal);
        if angle <= self.max_slope_angle {
            return;
        }

        displacement.x = sign(hit.normal.x) * (displacement.y.abs() - hit.distance) / angle.tan();

        self.collisions.slope_angle = angle;
        self.collisions.slope_normal = hit.normal;
        self.collisions.sliding_down_max_slope = true;
    }

    fn climb_slope(&mut self, displacement: &mut Vec2, angle: f32, normal: Vec2) {
        let distance = displacement.x.abs();
        let climb_y = angle.sin() * distance;

        // Never let a climb override a faster upward motion (e.g. a jump).
        if displacement.y <= climb_y {
            displacement.y = climb_y;
            displacement.x = angle.cos() * distance * sign(displacement.x);

            self.collisions.below = true;
            self.collisions.climbing_slope = true;
            self.collisions.slope_angle = angle;
            self.collisions.slope_normal = normal;
        }
    }

    fn horizontal_collisions<W: RayCaster + ?Sized>(&mut self, world: &W, displacement: &mut Vec2) {
        let skin = self.probe.skin();
        let origins = *self.probe.origins();
        let spacing = *self.probe.spacing();

        let direction_x = self.collisions.face_sign();
        let direction = Vec2::x() * direction_x;
        let mut ray_length = displacement.x.abs() + skin;
        if displacement.x.abs() < skin {
            // Still cast for walls we are pressed against while standing still.
            ray_length = 2.0 * skin;
        }

        for i in 0..spacing.horizontal_count {
            let origin = origins.bottom(direction_x) + Vec2::y() * (spacing.horizontal_spacing * i as f32);
            let hit = match self.cast(world, origin, direction, ray_length) {
                Some(hit) if hit.is_resting_contact() && hit.is_one_way() => {
                    self.cast_solid(world, origin, direction, ray_length)
                }
                hit => hit,
            };
            let Some(hit) = hit else {
                continue;
            };
            if hit.is_resting_contact() {
                continue;
            }

            let angle = slope_angle(hit.normal);
            let climbable = angle > SLOPE_ANGLE_EPS && angle <= self.max_climb_angle;

            if i == 0 && climbable {
                if self.collisions.descending_slope {
                    // Descending into a climbable slope (a V): undo the descend projection.
                    self.collisions.descending_slope = false;
                    *displacement = self.collisions.previous_displacement;
                }

                let mut distance_to_slope_start = 0.0;
                if angles_differ(angle, self.collisions.slope_angle_previous) {
                    distance_to_slope_start = hit.distance - skin;
                    displacement.x -= distance_to_slope_start * direction_x;
                }
                self.climb_slope(displacement, angle, hit.normal);
                displacement.x += distance_to_slope_start * direction_x;
            }

            if !self.collisions.climbing_slope || angle > self.max_climb_angle {
                // Clamp only: the move never grows past the request.
                displacement.x = (hit.distance - skin).min(displacement.x.abs()) * direction_x;
                ray_length = hit.distance;

                if self.collisions.climbing_slope {
                    displacement.y = self.collisions.slope_angle.tan() * displacement.x.abs();
                }

                self.collisions.left = direction_x < 0.0;
                self.collisions.right = direction_x > 0.0;
            }
        }
    }

    fn vertical_collisions<W: RayCaster + ?Sized>(
        &mut self,
        world: &W,
        displacement: &mut Vec2,
        now: Duration,
    ) {
        let skin = self.probe.skin();
        let origins = *self.probe.origins();
        let spacing = *self.probe.spacing();

        let direction_y = sign(displacement.y);
        let direction = Vec2::y() * direction_y;
        let mut ray_length = displacement.y.abs() + skin;

        for i in 0..spacing.vertical_count {
            let origin = origins.left(direction_y)
                + Vec2::x() * (spacing.vertical_spacing * i as f32 + displacement.x);
            let Some(mut hit) = self.cast(world, origin, direction, ray_length) else {
                continue;
            };
            if hit.is_one_way() && self.passes_one_way(&hit, direction_y, now) {
                let Some(solid) = self.cast_solid(world, origin, direction, ray_length) else {
                    continue;
                };
                hit = solid;
            }

            displacement.y = (hit.distance - skin) * direction_y;
            ray_length = hit.distance;

            if self.collisions.climbing_slope {
                displacement.x =
                    displacement.y / self.collisions.slope_angle.tan() * sign(displacement.x);
            }

            self.collisions.below = direction_y < 0.0;
            self.collisions.above = direction_y > 0.0;
        }

        if self.collisions.climbing_slope {
            // The climb may have carried us onto a different slope: cast again at the new height.
            let direction_x = sign(displacement.x);
            let ray_length = displacement.x.abs() + skin;
            let origin = origins.bottom(direction_x) + Vec2::y() * displacement.y;

            if let Some(hit) = self.cast(world, origin, Vec2::x() * direction_x, ray_length) {
                let angle = slope_angle(hit.normal);
                if !hit.is_resting_contact() && angles_differ(angle, self.collisions.slope_angle) {
                    displacement.x = (hit.distance - skin) * direction_x;
                    self.collisions.slope_angle = angle;
                    self.collisions.slope_normal = hit.normal;
                }
            }
        }
    }
}
