//! Kinematic motion component
//!
//! Velocity and acceleration integration with optional speed caps and
//! deceleration. Positions are owned by the actor; `integrate` returns the
//! displacement for the frame so the owner can apply it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SPEED_EPSILON;
use crate::{cartesian_to_polar, polar_to_cartesian};

/// Motion state for an actor: velocity, a per-frame acceleration accumulator,
/// optional speed caps and deceleration toward rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Kinematics {
    /// Current velocity (pixels/sec)
    pub velocity: Vec2,
    /// Acceleration accumulated for the current frame; cleared by `integrate`
    pub acceleration: Vec2,
    /// Whole-vector speed cap (pixels/sec)
    pub max_speed: Option<f32>,
    /// Independent per-axis caps; either may be active without the other
    pub max_speed_x: Option<f32>,
    pub max_speed_y: Option<f32>,
    /// Speed lost per second when no acceleration is applied that frame
    pub deceleration: f32,
}

impl Kinematics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.velocity = Vec2::new(vx, vy);
    }

    /// Set velocity from an angle in degrees and a speed magnitude
    pub fn set_velocity_polar(&mut self, angle_deg: f32, speed: f32) {
        self.velocity = polar_to_cartesian(speed, angle_deg.to_radians());
    }

    /// Current speed magnitude (pixels/sec)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Set speed while preserving the current motion angle. A stationary
    /// actor starts moving along +X.
    pub fn set_speed(&mut self, speed: f32) {
        if self.velocity.length_squared() == 0.0 {
            self.velocity = Vec2::new(speed, 0.0);
        } else {
            self.velocity = self.velocity.normalize() * speed;
        }
    }

    /// Direction of motion in degrees; 0 for a stationary actor
    pub fn motion_angle_deg(&self) -> f32 {
        if self.velocity.length_squared() == 0.0 {
            return 0.0;
        }
        let (_, theta) = cartesian_to_polar(self.velocity);
        theta.to_degrees()
    }

    /// Redirect motion to an angle in degrees, preserving speed
    pub fn set_motion_angle_deg(&mut self, angle_deg: f32) {
        let speed = self.speed();
        self.set_velocity_polar(angle_deg, speed);
    }

    /// Accumulate onto this frame's acceleration
    pub fn add_acceleration(&mut self, ax: f32, ay: f32) {
        self.acceleration += Vec2::new(ax, ay);
    }

    /// Accumulate an acceleration from an angle in degrees and a magnitude
    pub fn add_acceleration_polar(&mut self, angle_deg: f32, magnitude: f32) {
        self.acceleration += polar_to_cartesian(magnitude, angle_deg.to_radians());
    }

    pub fn set_max_speed(&mut self, s: f32) {
        self.max_speed = Some(s);
    }

    pub fn set_max_speed_x(&mut self, s: f32) {
        self.max_speed_x = Some(s);
    }

    pub fn set_max_speed_y(&mut self, s: f32) {
        self.max_speed_y = Some(s);
    }

    pub fn set_deceleration(&mut self, d: f32) {
        self.deceleration = d;
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.speed() > SPEED_EPSILON
    }

    /// Whether any acceleration has been applied this frame
    #[inline]
    pub fn is_accelerating(&self) -> bool {
        self.acceleration != Vec2::ZERO
    }

    /// Advance one timestep and return the position displacement.
    ///
    /// Order: acceleration, deceleration toward rest, per-axis caps, then the
    /// whole-vector cap. Per-axis clamps run first because clamping one
    /// component can still leave the full vector over the overall cap.
    /// The acceleration accumulator is cleared at the end of the step.
    pub fn integrate(&mut self, dt: f32) -> Vec2 {
        self.velocity += self.acceleration * dt;

        // Deceleration shrinks speed toward zero without flipping direction,
        // and only on frames with no applied acceleration.
        if self.deceleration > 0.0 && !self.is_accelerating() {
            let speed = self.velocity.length();
            if speed > 0.0 {
                let slowed = (speed - self.deceleration * dt).max(0.0);
                self.velocity = if slowed == 0.0 {
                    Vec2::ZERO
                } else {
                    self.velocity * (slowed / speed)
                };
            }
        }

        if let Some(mx) = self.max_speed_x {
            self.velocity.x = self.velocity.x.clamp(-mx, mx);
        }
        if let Some(my) = self.max_speed_y {
            self.velocity.y = self.velocity.y.clamp(-my, my);
        }
        if let Some(m) = self.max_speed {
            let speed = self.velocity.length();
            if speed > m {
                self.velocity *= m / speed;
            }
        }

        let displacement = self.velocity * dt;
        self.acceleration = Vec2::ZERO;
        displacement
    }
}
