//! 3D actor/camera analogue
//!
//! Minimal representation: position, quaternion orientation, scale. The
//! rotation matrix is derived on demand and never stored. Collision is
//! solved in the ground plane only: the actor's footprint rectangle, rotated
//! by its yaw, goes through the same convex-polygon machinery as the 2D
//! shapes, and push-out never touches the vertical axis.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::shape::{self, Polygon};
use crate::tuning::Tuning;

/// A positioned, oriented entity in the 3D demo; doubles as a fly camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor3 {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
    /// Ground-plane footprint extents: width along X, depth along Z
    pub footprint: Vec2,
    pub visible: bool,
}

impl Actor3 {
    pub fn new(position: Vec3, footprint: Vec2) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
            footprint,
            visible: true,
        }
    }

    /// Model matrix for the renderer, rebuilt from the minimal state
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }

    /// Heading around the world up axis, in degrees
    pub fn yaw_deg(&self) -> f32 {
        let (yaw, _, _) = self.orientation.to_euler(EulerRot::YXZ);
        yaw.to_degrees()
    }

    /// Rotate about the world up axis (positive turns counter-clockwise seen
    /// from above)
    pub fn turn_deg(&mut self, degrees: f32) {
        self.orientation = Quat::from_rotation_y(degrees.to_radians()) * self.orientation;
    }

    /// Rotate about the actor's own right axis (look up/down)
    pub fn tilt_deg(&mut self, degrees: f32) {
        self.orientation = self.orientation * Quat::from_rotation_x(degrees.to_radians());
    }

    /// Movement is always relative to current facing: the canonical unit
    /// vector is rotated by the orientation before scaling by distance.
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.orientation * Vec3::NEG_Z * distance;
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.orientation * Vec3::X * distance;
    }

    pub fn move_up(&mut self, distance: f32) {
        self.position += self.orientation * Vec3::Y * distance;
    }

    /// Footprint rectangle in the XZ plane, rotated by yaw only. Polygon
    /// y maps to world Z; yaw turns clockwise in that projection.
    pub fn footprint_polygon(&self) -> Polygon {
        let size = Vec2::new(
            self.footprint.x * self.scale.x,
            self.footprint.y * self.scale.z,
        );
        let bottom_left = Vec2::new(self.position.x, self.position.z) - size / 2.0;
        shape::rectangle(bottom_left, size, -self.yaw_deg())
    }

    /// Ground-plane collision test against another 3D actor
    pub fn overlaps(&self, other: &Actor3, tuning: &Tuning) -> bool {
        let (a, b) = (self.footprint_polygon(), other.footprint_polygon());
        if !shape::aabb_overlap(&a, &b) {
            return false;
        }
        shape::overlap_mtv(&a, &b)
            .map(|mtv| mtv.depth > tuning.penetration_threshold)
            .unwrap_or(false)
    }

    /// Like [`Self::overlaps`], but any overlap pushes this actor out along
    /// the MTV in X/Z; the vertical component is untouched.
    pub fn overlaps_resolve(&mut self, other: &Actor3, tuning: &Tuning) -> bool {
        let (a, b) = (self.footprint_polygon(), other.footprint_polygon());
        if !shape::aabb_overlap(&a, &b) {
            return false;
        }
        match shape::overlap_mtv(&a, &b) {
            Some(mtv) => {
                let push = mtv.normal * mtv.depth;
                self.position.x += push.x;
                self.position.z += push.y;
                mtv.depth > tuning.penetration_threshold
            }
            None => false,
        }
    }
}
