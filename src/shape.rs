//! Bounding shapes and convex polygon overlap
//!
//! Shapes are derived on demand from an actor's position/size/rotation and
//! never cached across frames. Overlap testing is separating-axis (SAT) over
//! convex polygons, reporting a minimum translation vector on hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ELLIPSE_INSET;

/// Which bounding polygon an actor derives from its box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    /// The four corners of the actor's box
    #[default]
    Rectangle,
    /// Fixed 8-vertex octagon inscribed in the box, corners cut at
    /// `(1 - inset)` and `inset` along each edge
    Ellipse { inset: f32 },
}

impl ShapeKind {
    /// Ellipse approximation at the default inset ratio
    pub fn ellipse() -> Self {
        ShapeKind::Ellipse { inset: ELLIPSE_INSET }
    }
}

/// A convex polygon in world space, vertices in counter-clockwise order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    /// Build from world-space vertices. At least three are required; fewer is
    /// a caller bug and fails fast in debug builds.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        debug_assert!(
            vertices.len() >= 3,
            "bounding polygon needs at least 3 vertices, got {}",
            vertices.len()
        );
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn translate(&mut self, offset: Vec2) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Vertex average; adequate as an interior reference point for convex shapes
    pub fn centroid(&self) -> Vec2 {
        let sum: Vec2 = self.vertices.iter().copied().sum();
        sum / self.vertices.len() as f32
    }

    /// Axis-aligned bounds as (min, max)
    pub fn aabb(&self) -> (Vec2, Vec2) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }
        (min, max)
    }
}

fn rotate_about(p: Vec2, center: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    let d = p - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Rectangle polygon for a box at `pos` (bottom-left corner) of `size`,
/// rotated about its center by `rotation_deg`
pub fn rectangle(pos: Vec2, size: Vec2, rotation_deg: f32) -> Polygon {
    let corners = vec![
        pos,
        pos + Vec2::new(size.x, 0.0),
        pos + size,
        pos + Vec2::new(0.0, size.y),
    ];
    rotated(corners, pos + size / 2.0, rotation_deg)
}

/// Octagon ellipse approximation for a box at `pos` of `size`. `inset` is the
/// corner-cut ratio along each edge (0.75 cuts at the quarter marks).
pub fn ellipse_octagon(pos: Vec2, size: Vec2, inset: f32, rotation_deg: f32) -> Polygon {
    let a = 1.0 - inset;
    let b = inset;
    let (w, h) = (size.x, size.y);
    let corners = vec![
        pos + Vec2::new(a * w, 0.0),
        pos + Vec2::new(b * w, 0.0),
        pos + Vec2::new(w, a * h),
        pos + Vec2::new(w, b * h),
        pos + Vec2::new(b * w, h),
        pos + Vec2::new(a * w, h),
        pos + Vec2::new(0.0, b * h),
        pos + Vec2::new(0.0, a * h),
    ];
    rotated(corners, pos + size / 2.0, rotation_deg)
}

fn rotated(corners: Vec<Vec2>, center: Vec2, rotation_deg: f32) -> Polygon {
    if rotation_deg == 0.0 {
        return Polygon::new(corners);
    }
    let rad = rotation_deg.to_radians();
    Polygon::new(corners.into_iter().map(|c| rotate_about(c, center, rad)).collect())
}

/// Cheap box-vs-box broad phase over the polygons' bounds
pub fn aabb_overlap(a: &Polygon, b: &Polygon) -> bool {
    let (min_a, max_a) = a.aabb();
    let (min_b, max_b) = b.aabb();
    min_a.x <= max_b.x && min_b.x <= max_a.x && min_a.y <= max_b.y && min_b.y <= max_a.y
}

/// Minimum translation vector separating two overlapping polygons.
/// `normal` is unit length and points so that moving the first polygon by
/// `normal * depth` separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mtv {
    pub normal: Vec2,
    pub depth: f32,
}

fn project(poly: &Polygon, axis: Vec2) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in poly.vertices() {
        let d = v.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Separating-axis overlap test for convex polygons. Returns the MTV for the
/// first polygon on overlap, `None` when separated or merely touching.
pub fn overlap_mtv(a: &Polygon, b: &Polygon) -> Option<Mtv> {
    debug_assert!(a.vertices().len() >= 3 && b.vertices().len() >= 3);

    let mut best_depth = f32::INFINITY;
    let mut best_axis = Vec2::ZERO;

    for poly in [a, b] {
        let verts = poly.vertices();
        for i in 0..verts.len() {
            let edge = verts[(i + 1) % verts.len()] - verts[i];
            let axis = Vec2::new(-edge.y, edge.x).normalize_or_zero();
            if axis == Vec2::ZERO {
                continue;
            }
            let (min_a, max_a) = project(a, axis);
            let (min_b, max_b) = project(b, axis);
            let overlap = max_a.min(max_b) - min_a.max(min_b);
            if overlap <= 0.0 {
                return None;
            }
            if overlap < best_depth {
                best_depth = overlap;
                best_axis = axis;
            }
        }
    }

    // Point the normal from b toward a so the caller is pushed out, not in.
    if (a.centroid() - b.centroid()).dot(best_axis) < 0.0 {
        best_axis = -best_axis;
    }

    Some(Mtv {
        normal: best_axis,
        depth: best_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rectangle_corners() {
        let poly = rectangle(Vec2::new(10.0, 20.0), Vec2::new(40.0, 30.0), 0.0);
        assert_eq!(poly.vertices().len(), 4);
        assert_eq!(poly.vertices()[0], Vec2::new(10.0, 20.0));
        assert_eq!(poly.vertices()[2], Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_octagon_cut_marks() {
        let poly = ellipse_octagon(Vec2::ZERO, Vec2::new(100.0, 40.0), 0.75, 0.0);
        let verts = poly.vertices();
        assert_eq!(verts.len(), 8);
        // Bottom edge cut at the quarter marks
        assert_eq!(verts[0], Vec2::new(25.0, 0.0));
        assert_eq!(verts[1], Vec2::new(75.0, 0.0));
        // Right edge
        assert_eq!(verts[2], Vec2::new(100.0, 10.0));
        assert_eq!(verts[3], Vec2::new(100.0, 30.0));
    }

    #[test]
    fn test_rotated_rectangle_aabb_grows() {
        let flat = rectangle(Vec2::ZERO, Vec2::new(40.0, 10.0), 0.0);
        let tilted = rectangle(Vec2::ZERO, Vec2::new(40.0, 10.0), 45.0);
        let (min_f, max_f) = flat.aabb();
        let (min_t, max_t) = tilted.aabb();
        assert!((max_f.y - min_f.y) < (max_t.y - min_t.y));
        // Rotation is about the center, which stays fixed
        let center_f = (min_f + max_f) / 2.0;
        let center_t = (min_t + max_t) / 2.0;
        assert!((center_f - center_t).length() < 1e-3);
    }

    #[test]
    fn test_aabb_broad_phase() {
        let a = rectangle(Vec2::ZERO, Vec2::new(10.0, 10.0), 0.0);
        let b = rectangle(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0), 0.0);
        let c = rectangle(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0), 0.0);
        assert!(!aabb_overlap(&a, &b));
        assert!(aabb_overlap(&a, &c));
    }

    #[test]
    fn test_separated_polygons_no_mtv() {
        let a = rectangle(Vec2::ZERO, Vec2::new(10.0, 10.0), 0.0);
        let b = rectangle(Vec2::new(10.5, 0.0), Vec2::new(10.0, 10.0), 0.0);
        assert!(overlap_mtv(&a, &b).is_none());
    }

    #[test]
    fn test_mtv_pushes_along_least_axis() {
        let a = rectangle(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 0.0);
        let b = rectangle(Vec2::new(8.0, -2.0), Vec2::new(10.0, 14.0), 0.0);
        let mtv = overlap_mtv(&a, &b).unwrap();
        // X penetration (2) is smaller than Y, so the push is along -X
        assert!((mtv.depth - 2.0).abs() < 1e-3);
        assert!((mtv.normal - Vec2::new(-1.0, 0.0)).length() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_mtv_round_trip_separates(
            ax in -50.0f32..50.0,
            ay in -50.0f32..50.0,
            aw in 5.0f32..60.0,
            ah in 5.0f32..60.0,
            dx in -20.0f32..20.0,
            dy in -20.0f32..20.0,
            bw in 5.0f32..60.0,
            bh in 5.0f32..60.0,
        ) {
            let a_pos = Vec2::new(ax, ay);
            let b_pos = a_pos + Vec2::new(dx, dy);
            let a = rectangle(a_pos, Vec2::new(aw, ah), 0.0);
            let b = rectangle(b_pos, Vec2::new(bw, bh), 0.0);

            if let Some(mtv) = overlap_mtv(&a, &b) {
                let mut moved = a.clone();
                moved.translate(mtv.normal * mtv.depth);
                let residual = overlap_mtv(&moved, &b).map(|m| m.depth).unwrap_or(0.0);
                prop_assert!(residual < 1e-3);
            }
        }
    }
}
