//! Data-driven motion/collision tunables
//!
//! Thresholds and scale factors that gameplay wants to tweak without
//! recompiling. Defaults mirror the constants in [`crate::consts`]; all of
//! them are data, not law.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Runtime tunables for the motion and collision layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Minimum penetration depth for an overlap to count as a collision.
    /// Shallower contact is "touching" and reports no hit.
    pub penetration_threshold: f32,
    /// Corner-cut ratio of the octagon ellipse approximation (0.5..1.0)
    pub ellipse_inset: f32,
    /// Outgoing angle when a ball strikes the paddle's left edge (degrees)
    pub paddle_angle_left_deg: f32,
    /// Outgoing angle when a ball strikes the paddle's right edge (degrees)
    pub paddle_angle_right_deg: f32,
    /// Pixels per external-physics world unit
    pub pixels_per_unit: f32,
    /// Velocity solver iterations per world step
    pub velocity_iterations: u32,
    /// Position solver iterations per world step
    pub position_iterations: u32,
    /// Speeds below this count as standing still
    pub speed_epsilon: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            penetration_threshold: consts::PENETRATION_THRESHOLD,
            ellipse_inset: consts::ELLIPSE_INSET,
            paddle_angle_left_deg: consts::PADDLE_ANGLE_LEFT,
            paddle_angle_right_deg: consts::PADDLE_ANGLE_RIGHT,
            pixels_per_unit: consts::PIXELS_PER_UNIT,
            velocity_iterations: consts::VELOCITY_ITERATIONS,
            position_iterations: consts::POSITION_ITERATIONS,
            speed_epsilon: consts::SPEED_EPSILON,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document. Unknown fields are ignored and
    /// missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning (penetration_threshold={}, pixels_per_unit={})",
            tuning.penetration_threshold,
            tuning.pixels_per_unit
        );
        Ok(tuning)
    }

    /// Serialize tuning to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.penetration_threshold, consts::PENETRATION_THRESHOLD);
        assert_eq!(t.ellipse_inset, consts::ELLIPSE_INSET);
        assert_eq!(t.paddle_angle_left_deg, 150.0);
        assert_eq!(t.paddle_angle_right_deg, 30.0);
        assert_eq!(t.pixels_per_unit, 100.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut t = Tuning::default();
        t.penetration_threshold = 0.25;
        t.pixels_per_unit = 32.0;

        let json = t.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t = Tuning::from_json(r#"{ "penetration_threshold": 1.5 }"#).unwrap();
        assert_eq!(t.penetration_threshold, 1.5);
        assert_eq!(t.ellipse_inset, consts::ELLIPSE_INSET);
    }
}
