//! Exact convex-polygon ray caster for deterministic scenario tests.

use crate::collision::{ColliderId, CollisionLayers, RayCaster, RayFilter, RayHit, Surface, Vec2};

const EDGE_EPS: f32 = 1.0e-6;

#[derive(Clone, Debug)]
struct Polygon {
    /// Counter-clockwise convex outline.
    vertices: Vec<Vec2>,
    id: ColliderId,
    surface: Surface,
    layers: CollisionLayers,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TestWorld {
    polygons: Vec<Polygon>,
}

#[inline]
fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

impl TestWorld {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_box(self, min: Vec2, max: Vec2, id: ColliderId) -> Self {
        self.with_box_full(min, max, id, Surface::Solid, CollisionLayers::ALL)
    }

    pub(crate) fn with_surface_box(self, min: Vec2, max: Vec2, id: ColliderId, surface: Surface) -> Self {
        self.with_box_full(min, max, id, surface, CollisionLayers::ALL)
    }

    pub(crate) fn with_layered_box(
        self,
        min: Vec2,
        max: Vec2,
        id: ColliderId,
        layers: CollisionLayers,
    ) -> Self {
        self.with_box_full(min, max, id, Surface::Solid, layers)
    }

    fn with_box_full(
        mut self,
        min: Vec2,
        max: Vec2,
        id: ColliderId,
        surface: Surface,
        layers: CollisionLayers,
    ) -> Self {
        self.polygons.push(Polygon {
            vertices: vec![min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
            id,
            surface,
            layers,
        });
        self
    }

    /// Add a convex polygon given counter-clockwise.
    pub(crate) fn with_polygon(mut self, vertices: &[Vec2], id: ColliderId) -> Self {
        self.polygons.push(Polygon {
            vertices: vertices.to_vec(),
            id,
            surface: Surface::Solid,
            layers: CollisionLayers::ALL,
        });
        self
    }
}

impl Polygon {
    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    fn strictly_contains(&self, point: Vec2) -> bool {
        self.edges().all(|(a, b)| cross(b - a, point - a) > EDGE_EPS)
    }

    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<(f32, Vec2)> {
        if self.strictly_contains(origin) {
            return Some((0.0, Vec2::zeros()));
        }

        let mut best: Option<(f32, Vec2)> = None;
        for (a, b) in self.edges() {
            let edge = b - a;
            let Some(normal) = Vec2::new(edge.y, -edge.x).try_normalize(1.0e-12) else {
                continue;
            };
            // Only front faces can be entered from outside.
            if normal.dot(&direction) >= 0.0 {
                continue;
            }
            let denom = cross(direction, edge);
            if denom.abs() < 1.0e-12 {
                continue;
            }
            let to_a = a - origin;
            let t = cross(to_a, edge) / denom;
            let s = cross(to_a, direction) / denom;
            if t < 0.0 || t > max_distance || !(-EDGE_EPS..=1.0 + EDGE_EPS).contains(&s) {
                continue;
            }
            if best.is_none_or(|(d, _)| t < d) {
                best = Some((t, normal));
            }
        }
        best
    }
}

impl RayCaster for TestWorld {
    fn cast_ray_filtered(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: RayFilter,
    ) -> Option<RayHit> {
        self.polygons
            .iter()
            .filter(|p| filter.accepts(p.layers, p.surface))
            .filter_map(|p| {
                p.cast(origin, direction, max_distance).map(|(distance, normal)| RayHit {
                    distance,
                    normal,
                    collider: p.id,
                    surface: p.surface,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_hits_report_face_normal_and_distance() {
        let world = TestWorld::new().with_box(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 0.0), ColliderId(3));

        let hit = world
            .cast_ray(Vec2::new(0.0, 2.0), -Vec2::y(), 10.0, CollisionLayers::ALL)
            .unwrap();
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1.0e-6);
        assert_relative_eq!(hit.normal, Vec2::y(), epsilon = 1.0e-6);
        assert_eq!(hit.collider, ColliderId(3));

        assert!(world.cast_ray(Vec2::new(0.0, 2.0), -Vec2::y(), 1.9, CollisionLayers::ALL).is_none());
        assert!(world.cast_ray(Vec2::new(0.0, 2.0), Vec2::y(), 10.0, CollisionLayers::ALL).is_none());
    }

    #[test]
    fn origin_inside_is_zero_distance() {
        let world = TestWorld::new().with_box(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), ColliderId(1));
        let hit = world.cast_ray(Vec2::zeros(), Vec2::x(), 5.0, CollisionLayers::ALL).unwrap();
        assert_eq!(hit.distance, 0.0);
        assert!(hit.is_resting_contact());
    }
}
