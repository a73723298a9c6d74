/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- the ray backend (anything implementing [`RayCaster`](super::RayCaster))
- the geometry probe (ray origins and spacing)
- the kinematic resolver and the moving platform driver
*/

use nalgebra as na;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Common math alias for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;

/// Axis-aligned rectangle described by its center and half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Bounds {
    #[inline]
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Full width and height.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Bounds moved inward by `margin` on every side.
    ///
    /// Half extents never go negative; a margin larger than the box collapses
    /// it onto its center.
    #[inline]
    pub fn shrunk(&self, margin: f32) -> Self {
        Self {
            center: self.center,
            half_extents: Vec2::new(
                (self.half_extents.x - margin).max(0.0),
                (self.half_extents.y - margin).max(0.0),
            ),
        }
    }
}

/// Stable identifier of whatever a ray hit (a static collider, a moving body).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColliderId(pub u32);

/// How a surface reacts to a body moving into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Surface {
    /// Blocks from every direction.
    #[default]
    Solid,
    /// Blocks only bodies landing on it from above; can be dropped through on request.
    OneWay,
}

/// Bit set of collision layers.
///
/// Bodies and colliders declare the layers they belong to; ray casts carry a
/// mask of the layers they are allowed to hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Layer with only bit `index` set. `index` must be < 32.
    #[inline]
    pub const fn layer(index: u8) -> Self {
        Self(1 << index)
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for CollisionLayers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Nearest hit returned by a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point. Zero when the ray starts inside the shape.
    pub distance: f32,
    /// World-space surface normal at the hit point.
    pub normal: Vec2,
    /// What was hit.
    pub collider: ColliderId,
    /// Surface behavior of the hit collider.
    pub surface: Surface,
}

impl RayHit {
    /// A hit at exactly zero distance is resting contact, not an obstruction.
    #[inline]
    pub fn is_resting_contact(&self) -> bool {
        self.distance == 0.0
    }

    #[inline]
    pub fn is_one_way(&self) -> bool {
        self.surface == Surface::OneWay
    }
}
