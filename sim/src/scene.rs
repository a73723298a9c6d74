//! Ray queries against the static level plus every moving box.

use kinematic::{ColliderId, CollisionLayers, RayCaster, RayFilter, RayHit, StaticWorld, Surface, Vec2};
use rapier2d::parry::{query::RayCast, shape::Cuboid};
use rapier2d::prelude::{Isometry, Ray, point, vector};

/// Collision layer of level geometry.
pub const STATIC_LAYER: CollisionLayers = CollisionLayers::layer(0);
/// Collision layer of players.
pub const PLAYER_LAYER: CollisionLayers = CollisionLayers::layer(1);
/// Collision layer of moving platforms.
pub const PLATFORM_LAYER: CollisionLayers = CollisionLayers::layer(2);

/// Snapshot of one moving axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyBox {
    pub id: ColliderId,
    pub center: Vec2,
    pub half_extents: Vec2,
    pub layers: CollisionLayers,
    pub surface: Surface,
}

impl BodyBox {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        let shape = Cuboid::new(vector![self.half_extents.x, self.half_extents.y]);
        let pose = Isometry::translation(self.center.x, self.center.y);
        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);

        shape
            .cast_ray_and_get_normal(&pose, &ray, max_distance, true)
            .map(|hit| RayHit {
                distance: hit.time_of_impact,
                normal: Vec2::new(hit.normal.x, hit.normal.y),
                collider: self.id,
                surface: self.surface,
            })
    }
}

/// Composes the static world with the moving boxes of the current step.
pub struct SceneCaster<'a> {
    statics: &'a StaticWorld,
    bodies: &'a [BodyBox],
    exclude: Option<ColliderId>,
}

impl<'a> SceneCaster<'a> {
    pub fn new(statics: &'a StaticWorld, bodies: &'a [BodyBox]) -> Self {
        Self {
            statics,
            bodies,
            exclude: None,
        }
    }

    /// Skip the caster's own box.
    pub fn excluding(mut self, id: ColliderId) -> Self {
        self.exclude = Some(id);
        self
    }
}

impl RayCaster for SceneCaster<'_> {
    fn cast_ray_filtered(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        let moving = self
            .bodies
            .iter()
            .filter(|b| Some(b.id) != self.exclude && filter.accepts(b.layers, b.surface))
            .filter_map(|b| b.cast(origin, direction, max_distance));

        self.statics
            .cast_ray_filtered(origin, direction, max_distance, filter)
            .into_iter()
            .chain(moving)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
