//! Arcade Motion - kinematic actors and collision resolution for 2D arcade games
//!
//! Core modules:
//! - `actor`: positioned, sized entities built from optional components
//! - `kinematics`: velocity/acceleration integration, speed caps, deceleration
//! - `shape`: bounding polygons (rectangle and octagon ellipse) with SAT overlap
//! - `collision`: push-out resolution, swept side classification, paddle deflection
//! - `stage`: frame driver with deterministic ordering and deferred removal
//! - `physics`: adapter onto an external rigid-body engine (contact routing)
//! - `spatial3`: lower-fidelity 3D position/orientation with footprint collision
//! - `tuning`: data-driven thresholds and scale factors
//!
//! The simulation is single-threaded and driven by a fixed timestep. Rendering,
//! assets, audio and input live outside this crate and only read actor state.

pub mod actor;
pub mod collision;
pub mod kinematics;
pub mod physics;
pub mod shape;
pub mod spatial3;
pub mod stage;
pub mod tuning;

pub use actor::{Actor, ActorId, ActorKind, ActorTemplate, AnimationSelector};
pub use collision::{BounceReport, overlaps, overlaps_resolve, paddle_deflect};
pub use kinematics::Kinematics;
pub use physics::{ContactEvent, ContactPhase, PhysicsAdapter, PhysicsEngine};
pub use shape::{Mtv, Polygon, ShapeKind};
pub use spatial3::Actor3;
pub use stage::{RemovalSet, Stage};
pub use tuning::Tuning;

use glam::Vec2;

/// Default simulation constants; runtime values live in [`tuning::Tuning`]
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Penetration depth below which an overlap counts as touching, not colliding
    pub const PENETRATION_THRESHOLD: f32 = 0.5;
    /// Corner-cut ratio of the octagon ellipse approximation
    pub const ELLIPSE_INSET: f32 = 0.75;

    /// Paddle deflection angle at the paddle's left edge (degrees)
    pub const PADDLE_ANGLE_LEFT: f32 = 150.0;
    /// Paddle deflection angle at the paddle's right edge (degrees)
    pub const PADDLE_ANGLE_RIGHT: f32 = 30.0;

    /// Physics world scale (pixels per world unit)
    pub const PIXELS_PER_UNIT: f32 = 100.0;
    /// Solver iteration counts handed to the external world step
    pub const VELOCITY_ITERATIONS: u32 = 8;
    pub const POSITION_ITERATIONS: u32 = 3;

    /// Speeds below this count as standing still
    pub const SPEED_EPSILON: f32 = 0.01;
}

/// Normalize angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_polar_round_trip() {
        let v = polar_to_cartesian(10.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(v);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - PI / 3.0).abs() < 1e-4);
    }
}
