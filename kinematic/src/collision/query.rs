use super::types::{CollisionLayers, RayHit, Surface, Vec2};

/// Which colliders a ray may hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayFilter {
    pub mask: CollisionLayers,
    /// Skip [`Surface::OneWay`] colliders entirely, so solids behind them are found.
    pub skip_one_way: bool,
}

impl RayFilter {
    #[inline]
    pub const fn new(mask: CollisionLayers) -> Self {
        Self {
            mask,
            skip_one_way: false,
        }
    }

    #[inline]
    pub const fn skipping_one_way(mut self, skip: bool) -> Self {
        self.skip_one_way = skip;
        self
    }

    /// True if a collider with `layers` and `surface` can be hit.
    #[inline]
    pub fn accepts(&self, layers: CollisionLayers, surface: Surface) -> bool {
        layers.intersects(self.mask) && !(self.skip_one_way && surface == Surface::OneWay)
    }
}

impl From<CollisionLayers> for RayFilter {
    fn from(mask: CollisionLayers) -> Self {
        Self::new(mask)
    }
}

/// The single geometry primitive the resolver and platform driver depend on.
///
/// Implementations return the nearest hit along `direction` (a unit vector)
/// within `max_distance` among the colliders `filter` accepts. Rejected
/// colliders must not occlude accepted ones. A miss is `None` and is a normal
/// outcome.
///
/// A ray that starts inside a shape must report a hit at distance `0.0`.
pub trait RayCaster {
    fn cast_ray_filtered(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit>;

    /// Nearest hit among colliders whose layers intersect `mask`.
    #[inline]
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> Option<RayHit> {
        self.cast_ray_filtered(origin, direction, max_distance, RayFilter::new(mask))
    }
}

impl<T: RayCaster + ?Sized> RayCaster for &T {
    #[inline]
    fn cast_ray_filtered(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        (**self).cast_ray_filtered(origin, direction, max_distance, filter)
    }
}
