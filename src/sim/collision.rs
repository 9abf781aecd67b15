//! Collision detection and response for axis-aligned shapes
//!
//! Rectangles are tested against rectangles (AABB overlap) and against
//! points (shots). The contact normal always points from the first body
//! toward the second and lies on the axis of least penetration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Shape};

/// Extra distance bodies are pushed apart so a resolved contact does not
/// register as still touching on the next step
pub const CONTACT_SKIN: f32 = 0.01;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) / 2.0
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Strict containment: points on the boundary are outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Inclusive containment, used for spawn bounds
    pub fn encloses(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Penetration depth along the normal
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }
}

/// Check two bodies for overlap
pub fn body_collision(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Rect { .. }, Shape::Rect { .. }) => rect_rect_collision(&a.bounds(), &b.bounds()),
        (Shape::Point, Shape::Rect { .. }) => point_rect_collision(a.position, &b.bounds()),
        (Shape::Rect { .. }, Shape::Point) => {
            let mut result = point_rect_collision(b.position, &a.bounds());
            result.normal = -result.normal;
            result
        }
        (Shape::Point, Shape::Point) => CollisionResult::miss(),
    }
}

/// AABB vs AABB, separating along the axis of least overlap
pub fn rect_rect_collision(a: &Aabb, b: &Aabb) -> CollisionResult {
    if !a.overlaps(b) {
        return CollisionResult::miss();
    }

    let delta = b.center() - a.center();
    let overlap = a.half_extents() + b.half_extents() - delta.abs();

    if overlap.x < overlap.y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        CollisionResult::hit(Vec2::new(sign, 0.0), overlap.x)
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        CollisionResult::hit(Vec2::new(0.0, sign), overlap.y)
    }
}

/// Point (first) vs AABB (second)
///
/// The point leaves through the nearest face, so the normal toward the
/// rectangle is the inverse of that face's outward normal.
pub fn point_rect_collision(point: Vec2, rect: &Aabb) -> CollisionResult {
    if !rect.contains_point(point) {
        return CollisionResult::miss();
    }

    // (distance to face, outward normal of face)
    let faces = [
        (point.x - rect.min.x, Vec2::NEG_X),
        (rect.max.x - point.x, Vec2::X),
        (point.y - rect.min.y, Vec2::NEG_Y),
        (rect.max.y - point.y, Vec2::Y),
    ];

    let (depth, outward) = faces
        .into_iter()
        .fold((f32::INFINITY, Vec2::ZERO), |best, face| {
            if face.0 < best.0 { face } else { best }
        });

    CollisionResult::hit(-outward, depth)
}

/// Elasticity used for a pair (product of both bodies' elasticities)
#[inline]
pub fn combined_elasticity(a: &Body, b: &Body) -> f32 {
    a.elasticity * b.elasticity
}

/// Resolve the normal component of two velocities
///
/// Only the component along `normal` changes, scaled by `elasticity`.
/// Static sides act as infinite mass; two dynamic bodies are treated as
/// equal mass. Pairs already separating are left alone.
pub fn resolve_velocities(
    va: Vec2,
    vb: Vec2,
    normal: Vec2,
    elasticity: f32,
    a_dynamic: bool,
    b_dynamic: bool,
) -> (Vec2, Vec2) {
    let closing = (vb - va).dot(normal);
    if closing >= 0.0 {
        return (va, vb);
    }

    match (a_dynamic, b_dynamic) {
        (true, true) => {
            let j = -(1.0 + elasticity) * closing / 2.0;
            (va - normal * j, vb + normal * j)
        }
        (true, false) => {
            let j = -(1.0 + elasticity) * closing;
            (va - normal * j, vb)
        }
        (false, true) => {
            let j = -(1.0 + elasticity) * closing;
            (va, vb + normal * j)
        }
        (false, false) => (va, vb),
    }
}

/// Position corrections that push two overlapping bodies apart
pub fn separation(
    normal: Vec2,
    penetration: f32,
    a_dynamic: bool,
    b_dynamic: bool,
) -> (Vec2, Vec2) {
    let push = normal * (penetration + CONTACT_SKIN);
    match (a_dynamic, b_dynamic) {
        (true, true) => (-push / 2.0, push / 2.0),
        (true, false) => (-push, Vec2::ZERO),
        (false, true) => (Vec2::ZERO, push),
        (false, false) => (Vec2::ZERO, Vec2::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(cx: f32, cy: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_center(Vec2::new(cx, cy), Vec2::new(w, h) / 2.0)
    }

    #[test]
    fn test_rect_rect_overlap_picks_shallow_axis() {
        // Wall along the bottom, box sinking into it from above
        let wall = rect(400.0, 0.0, 800.0, 20.0);
        let boxed = rect(100.0, 12.0, 10.0, 10.0);

        let result = rect_rect_collision(&boxed, &wall);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));
        assert!((result.penetration - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        assert!(!rect_rect_collision(&a, &b).hit);
    }

    #[test]
    fn test_point_inside_wall_exits_through_nearest_face() {
        let top_wall = rect(400.0, 600.0, 800.0, 20.0);

        // Coming up from below, 2px past the lower face
        let result = point_rect_collision(Vec2::new(300.0, 592.0), &top_wall);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, 1.0));
        assert!((result.penetration - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_point_outside_misses() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!point_rect_collision(Vec2::new(5.0, 0.0), &r).hit);
        assert!(!point_rect_collision(Vec2::new(20.0, 0.0), &r).hit);
    }

    #[test]
    fn test_static_bounce_reflects_normal_axis_only() {
        // Dynamic body moving up-right into a static body above it
        let (va, vb) = resolve_velocities(
            Vec2::new(30.0, 200.0),
            Vec2::ZERO,
            Vec2::Y,
            1.0,
            true,
            false,
        );
        assert_eq!(va, Vec2::new(30.0, -200.0));
        assert_eq!(vb, Vec2::ZERO);
    }

    #[test]
    fn test_elasticity_scales_bounce() {
        let (va, _) = resolve_velocities(
            Vec2::new(0.0, -100.0),
            Vec2::ZERO,
            Vec2::NEG_Y,
            0.9,
            true,
            false,
        );
        assert!((va.y - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_separating_pair_untouched() {
        let (va, vb) = resolve_velocities(
            Vec2::new(0.0, -50.0),
            Vec2::ZERO,
            Vec2::Y,
            1.0,
            true,
            false,
        );
        assert_eq!(va, Vec2::new(0.0, -50.0));
        assert_eq!(vb, Vec2::ZERO);
    }

    #[test]
    fn test_equal_mass_elastic_exchange() {
        let (va, vb) = resolve_velocities(
            Vec2::new(10.0, 0.0),
            Vec2::new(-10.0, 0.0),
            Vec2::X,
            1.0,
            true,
            true,
        );
        assert!((va.x + 10.0).abs() < 1e-4);
        assert!((vb.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_separation_moves_only_dynamic_side() {
        let (da, db) = separation(Vec2::Y, 2.0, true, false);
        assert!(da.y < -2.0);
        assert_eq!(db, Vec2::ZERO);
    }
}
