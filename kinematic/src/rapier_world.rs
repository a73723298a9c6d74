//! Rapier-based query world for immutable/static level geometry.
//!
//! Builds an in-memory rapier2d scene from a set of static collider definitions
//! and answers the resolver's ray casts against it.
//!
//! Design goals
//! - Deterministic: given the same inputs, insertion order is by `id`.
//! - Query-only: no dynamics are stepped; the pipeline runs collision detection once.
//! - Immutable world: statics do not move after construction. Moving bodies
//!   (players, platforms) are layered on top by the caller.

// Re-export Rapier so downstream crates can use its shapes without a direct dependency.
pub use rapier2d;

use log::debug;
use rapier2d::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    collision::{ColliderId, CollisionLayers, RayCaster, RayFilter, RayHit, Surface, Vec2},
};

/// Collider metadata packed into rapier's per-collider `user_data`.
///
/// # Bit layout
/// Least-significant bit = bit 0:
///
/// - bits 0..=31   : collider id (u32)
/// - bits 32..=63  : [`CollisionLayers`] membership (u32)
/// - bit  64       : surface kind, set for [`Surface::OneWay`]
/// - bits 65..=127 : reserved (zero)
pub type PackedCollider = u128;

const LAYERS_SHIFT: u32 = u32::BITS;
const SURFACE_SHIFT: u32 = 2 * u32::BITS;

pub fn pack_collider(id: ColliderId, layers: CollisionLayers, surface: Surface) -> PackedCollider {
    let one_way = matches!(surface, Surface::OneWay) as u128;
    (id.0 as u128) | ((layers.0 as u128) << LAYERS_SHIFT) | (one_way << SURFACE_SHIFT)
}

#[inline]
pub fn unpack_collider_id(packed: PackedCollider) -> ColliderId {
    ColliderId(packed as u32)
}

#[inline]
pub fn unpack_layers(packed: PackedCollider) -> CollisionLayers {
    CollisionLayers((packed >> LAYERS_SHIFT) as u32)
}

#[inline]
pub fn unpack_surface(packed: PackedCollider) -> Surface {
    if (packed >> SURFACE_SHIFT) & 1 == 1 {
        Surface::OneWay
    } else {
        Surface::Solid
    }
}

/// Canonical, schema-agnostic definition of an immutable level collider.
///
/// Conventions
/// - Units are world units, rotation is radians counter-clockwise.
/// - Shape points (segments, polylines, triangles) are local to the pose.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldStaticDef {
    /// Stable unique identifier; also the [`ColliderId`] reported in hits.
    pub id: u32,
    pub translation: Vec2,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: f32,
    pub shape: ColliderShapeDef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layers: CollisionLayers,
    #[cfg_attr(feature = "serde", serde(default))]
    pub surface: Surface,
}

/// Supported static collider shapes.
///
/// Keep this intentionally small. Extend as needed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "kind", rename_all = "snake_case"))]
pub enum ColliderShapeDef {
    /// Box with given half extents. Rotate it for ramps.
    Cuboid { half_extents: Vec2 },

    Ball { radius: f32 },

    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },

    /// Single segment, typically a thin one-way ledge.
    Segment { a: Vec2, b: Vec2 },

    /// Open chain of segments (terrain outlines).
    Polyline { vertices: Vec<Vec2> },

    Triangle { a: Vec2, b: Vec2, c: Vec2 },
}

impl WorldStaticDef {
    pub fn new(id: u32, translation: Vec2, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: 0.0,
            shape,
            layers: CollisionLayers::ALL,
            surface: Surface::Solid,
        }
    }

    /// Axis-aligned box spanning `min..max`.
    pub fn aabb(id: u32, min: Vec2, max: Vec2) -> Self {
        Self::new(
            id,
            (min + max) * 0.5,
            ColliderShapeDef::Cuboid {
                half_extents: (max - min) * 0.5,
            },
        )
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }
}

#[inline]
fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

fn all_finite(points: &[Vec2]) -> bool {
    points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose lives on the parent rigid-body, so the collider has an identity local transform.
fn collider_from_def(def: &WorldStaticDef) -> Result<Collider, ConfigError> {
    let invalid = |reason| ConfigError::InvalidCollider { id: def.id, reason };
    let positive = |v: f32| v.is_finite() && v > 0.0;

    let builder = match &def.shape {
        ColliderShapeDef::Cuboid { half_extents } => {
            if !positive(half_extents.x) || !positive(half_extents.y) {
                return Err(invalid("cuboid half extents must be finite and positive"));
            }
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        }

        ColliderShapeDef::Ball { radius } => {
            if !positive(*radius) {
                return Err(invalid("ball radius must be finite and positive"));
            }
            ColliderBuilder::ball(*radius)
        }

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => {
            if !positive(*radius) || !half_height.is_finite() || *half_height < 0.0 {
                return Err(invalid("capsule dimensions must be finite, radius positive"));
            }
            ColliderBuilder::capsule_y(*half_height, *radius)
        }

        ColliderShapeDef::Segment { a, b } => {
            if !all_finite(&[*a, *b]) || a == b {
                return Err(invalid("segment end points must be finite and distinct"));
            }
            ColliderBuilder::segment(to_point(*a), to_point(*b))
        }

        ColliderShapeDef::Polyline { vertices } => {
            if vertices.len() < 2 || !all_finite(vertices) {
                return Err(invalid("polyline needs at least two finite vertices"));
            }
            ColliderBuilder::polyline(vertices.iter().copied().map(to_point).collect(), None)
        }

        ColliderShapeDef::Triangle { a, b, c } => {
            if !all_finite(&[*a, *b, *c]) || (b - a).perp(&(c - a)).abs() <= f32::EPSILON {
                return Err(invalid("triangle must be finite and non-degenerate"));
            }
            ColliderBuilder::triangle(to_point(*a), to_point(*b), to_point(*c))
        }
    };

    Ok(builder
        .user_data(pack_collider(ColliderId(def.id), def.layers, def.surface))
        .build())
}

/// In-memory Rapier structures needed for ray queries against the static level.
///
/// Built once at startup and reused for every step.
pub struct StaticWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl StaticWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// The input is sorted by `id` before insertion; ids must be unique.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Result<Self, ConfigError> {
        defs.sort_by_key(|d| d.id);
        if let Some(pair) = defs.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(ConfigError::DuplicateColliderId(pair[0].id));
        }

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in &defs {
            if !all_finite(&[def.translation]) || !def.rotation.is_finite() {
                return Err(ConfigError::InvalidCollider {
                    id: def.id,
                    reason: "pose must be finite",
                });
            }
            let collider = collider_from_def(def)?;

            let iso = Isometry::new(vector![def.translation.x, def.translation.y], def.rotation);
            let rb_handle = bodies.insert(RigidBodyBuilder::fixed().pose(iso).build());
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Collision detection only (no dynamics): updates the broad-phase BVH so queries can run.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();
        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        debug!("static world built with {} colliders", colliders.len());

        Ok(Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        })
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Borrowed `QueryPipeline` view over the statics.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

impl RayCaster for StaticWorld {
    fn cast_ray_filtered(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        let accepted = |_: ColliderHandle, c: &Collider| {
            filter.accepts(unpack_layers(c.user_data), unpack_surface(c.user_data))
        };
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&accepted));

        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);
        let (handle, hit) = pipeline.cast_ray_and_get_normal(&ray, max_distance, true)?;
        let packed = self.colliders.get(handle)?.user_data;

        let mut normal = Vec2::new(hit.normal.x, hit.normal.y);
        // Segments and polylines report either side; always face the ray.
        if normal.dot(&direction) > 0.0 {
            normal = -normal;
        }

        Some(RayHit {
            distance: hit.time_of_impact,
            normal,
            collider: unpack_collider_id(packed),
            surface: unpack_surface(packed),
        })
    }
}
